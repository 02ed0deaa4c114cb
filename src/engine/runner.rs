//! Drivers for a single node instance.
//!
//! A runner owns the node, its context and its state, and enforces the call
//! order Initialize → (input rule → run)*. Taking `&mut self` everywhere keeps
//! execution single-flight per instance.

use super::lifecycle::LifecycleState;
use crate::core::{
    ConfigurationMap, Context, Input, InputPorts, NodeError, NodeResult, Operator, Output, PortId,
    Sink, Source, Token,
};
use tracing::{debug, info, trace, warn};

/// Context, state and lifecycle shared by the three runner kinds.
struct Instance<S> {
    context: Context,
    state: Option<S>,
    lifecycle: LifecycleState,
}

impl<S> Instance<S> {
    fn new(node_id: String) -> Self {
        Self {
            context: Context::new(node_id),
            state: None,
            lifecycle: LifecycleState::Uninitialized,
        }
    }

    fn initialize(&mut self, create: impl FnOnce() -> NodeResult<S>) -> NodeResult<()> {
        if !self.lifecycle.can_transition_to(&LifecycleState::Initialized) {
            return Err(NodeError::ContractViolation(format!(
                "node `{}` initialized twice",
                self.context.node_id
            )));
        }
        self.state = Some(create()?);
        self.lifecycle.transition_to(LifecycleState::Initialized)?;
        info!(node = %self.context.node_id, "node initialized");
        Ok(())
    }

    fn parts(&self) -> NodeResult<(&Context, &S)> {
        match &self.state {
            Some(state) => Ok((&self.context, state)),
            None => Err(self.not_initialized()),
        }
    }

    fn parts_mut(&mut self) -> NodeResult<(&mut Context, &mut S)> {
        match &mut self.state {
            Some(state) => Ok((&mut self.context, state)),
            None => Err(NodeError::ContractViolation(format!(
                "node `{}` is not initialized",
                self.context.node_id
            ))),
        }
    }

    fn not_initialized(&self) -> NodeError {
        NodeError::ContractViolation(format!("node `{}` is not initialized", self.context.node_id))
    }

    /// Moves into `Executing`, invokes `run`, and returns to `Initialized`
    /// whatever the outcome.
    fn execute<T>(
        &mut self,
        run: impl FnOnce(&mut Context, &mut S) -> NodeResult<T>,
    ) -> NodeResult<T> {
        self.lifecycle.transition_to(LifecycleState::Executing)?;
        let result = match self.parts_mut() {
            Ok((context, state)) => run(context, state),
            Err(e) => Err(e),
        };
        self.lifecycle.transition_to(LifecycleState::Initialized)?;
        self.context.cycle += 1;

        if let Err(e) = &result {
            warn!(node = %self.context.node_id, cycle = self.context.cycle, error = %e, "run failed");
        }
        result
    }

    fn tear_down(self) {
        info!(node = %self.context.node_id, cycles = self.context.cycle, "node torn down");
    }
}

/// Token validation and admitted-input bookkeeping for gated nodes.
#[derive(Default)]
struct Gate {
    declared: Option<Vec<PortId>>,
    admitted: Option<Vec<Input>>,
}

impl Gate {
    fn declare(&mut self, ports: InputPorts) {
        match ports {
            InputPorts::Registered => {}
            InputPorts::Declared(ports) => self.declared = Some(ports),
            InputPorts::Open => self.declared = None,
        }
    }

    /// Checks that every declared port has exactly one token and orders the
    /// tokens by declaration. Without declared ports the tokens pass through.
    fn order(&self, tokens: Vec<Token>) -> NodeResult<Vec<Token>> {
        let Some(declared) = &self.declared else {
            return Ok(tokens);
        };

        let mut slots: Vec<Option<Token>> = (0..declared.len()).map(|_| None).collect();
        for token in tokens {
            let index = declared
                .iter()
                .position(|port| port == token.port_id())
                .ok_or_else(|| {
                    NodeError::ContractViolation(format!(
                        "token for undeclared port `{}`",
                        token.port_id()
                    ))
                })?;
            if slots[index].is_some() {
                return Err(NodeError::ContractViolation(format!(
                    "more than one token for port `{}`",
                    token.port_id()
                )));
            }
            slots[index] = Some(token);
        }

        slots
            .into_iter()
            .zip(declared)
            .map(|(slot, port)| {
                slot.ok_or_else(|| {
                    NodeError::ContractViolation(format!("no token for port `{}`", port))
                })
            })
            .collect()
    }

    fn admit(&mut self, tokens: Vec<Token>) {
        self.admitted = Some(tokens.into_iter().filter_map(Token::into_input).collect());
    }

    fn take(&mut self) -> NodeResult<Vec<Input>> {
        self.admitted.take().ok_or_else(|| {
            NodeError::ContractViolation("run invoked without a true input rule result".into())
        })
    }
}

fn check_gate_allowed(node_id: &str, lifecycle: LifecycleState) -> NodeResult<()> {
    match lifecycle {
        LifecycleState::Initialized => Ok(()),
        LifecycleState::Admitted => Err(NodeError::ContractViolation(format!(
            "input rule of `{}` evaluated again before the admitted run",
            node_id
        ))),
        other => Err(NodeError::ContractViolation(format!(
            "input rule of `{}` evaluated while {}",
            node_id,
            other.name()
        ))),
    }
}

fn check_run_allowed(node_id: &str, lifecycle: LifecycleState) -> NodeResult<()> {
    if lifecycle == LifecycleState::Admitted {
        Ok(())
    } else {
        Err(NodeError::ContractViolation(format!(
            "run of `{}` invoked while {} without a true input rule result",
            node_id,
            lifecycle.name()
        )))
    }
}

pub struct SourceRunner<S: Source> {
    node: S,
    instance: Instance<S::State>,
}

impl<S: Source> SourceRunner<S> {
    pub fn new(node_id: impl Into<String>, node: S) -> Self {
        Self {
            node,
            instance: Instance::new(node_id.into()),
        }
    }

    pub fn with_mode(mut self, mode: usize) -> Self {
        self.instance.context.mode = mode;
        self
    }

    pub fn initialize(&mut self, configuration: &ConfigurationMap) -> NodeResult<()> {
        let node = &self.node;
        self.instance.initialize(|| node.initialize(configuration))
    }

    /// Produces the outputs of one cycle. May block on the node's external input.
    pub fn run(&mut self) -> NodeResult<Vec<Output>> {
        if self.instance.lifecycle != LifecycleState::Initialized {
            return Err(self.instance.not_initialized());
        }
        let node = &self.node;
        let outputs = self.instance.execute(|context, state| node.run(context, state))?;
        trace!(node = %self.instance.context.node_id, outputs = outputs.len(), "source produced");
        Ok(outputs)
    }

    pub fn context(&self) -> &Context {
        &self.instance.context
    }

    pub fn state(&self) -> Option<&S::State> {
        self.instance.state.as_ref()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.instance.lifecycle
    }

    /// Drops the node state. Equivalent to dropping the runner, but logged.
    pub fn tear_down(self) {
        self.instance.tear_down();
    }
}

pub struct OperatorRunner<O: Operator> {
    node: O,
    instance: Instance<O::State>,
    gate: Gate,
}

impl<O: Operator> OperatorRunner<O> {
    pub fn new(node_id: impl Into<String>, node: O) -> Self {
        Self {
            node,
            instance: Instance::new(node_id.into()),
            gate: Gate::default(),
        }
    }

    /// Declares the input ports; tokens are then validated and ordered against them.
    /// A node declaring its own ports at initialization overrides these.
    pub fn with_inputs<I, P>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PortId>,
    {
        self.gate.declared = Some(ports.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mode(mut self, mode: usize) -> Self {
        self.instance.context.mode = mode;
        self
    }

    /// Initializes the state, then applies the ports the node declares for it.
    pub fn initialize(&mut self, configuration: &ConfigurationMap) -> NodeResult<()> {
        let node = &self.node;
        self.instance.initialize(|| node.initialize(configuration))?;
        let (_, state) = self.instance.parts()?;
        self.gate.declare(node.input_ports(state)?);
        Ok(())
    }

    /// Evaluates the input rule. On true, the ready tokens become the inputs of
    /// the next [`run`](Self::run).
    pub fn gate(&mut self, tokens: Vec<Token>) -> NodeResult<bool> {
        check_gate_allowed(&self.instance.context.node_id, self.instance.lifecycle)?;
        let tokens = self.gate.order(tokens)?;
        let (context, state) = self.instance.parts()?;
        let admitted = self.node.input_rule(context, state, &tokens)?;
        debug!(node = %context.node_id, cycle = context.cycle, admitted, "input rule evaluated");

        if admitted {
            self.gate.admit(tokens);
            self.instance.lifecycle.transition_to(LifecycleState::Admitted)?;
        }
        Ok(admitted)
    }

    pub fn run(&mut self) -> NodeResult<Vec<Output>> {
        check_run_allowed(&self.instance.context.node_id, self.instance.lifecycle)?;
        let inputs = self.gate.take()?;
        let node = &self.node;
        self.instance
            .execute(|context, state| node.run(context, state, inputs))
    }

    /// Gate then run. Returns `None` when the input rule vetoed the cycle.
    pub fn cycle(&mut self, tokens: Vec<Token>) -> NodeResult<Option<Vec<Output>>> {
        if !self.gate(tokens)? {
            return Ok(None);
        }
        self.run().map(Some)
    }

    pub fn context(&self) -> &Context {
        &self.instance.context
    }

    pub fn state(&self) -> Option<&O::State> {
        self.instance.state.as_ref()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.instance.lifecycle
    }

    pub fn tear_down(self) {
        self.instance.tear_down();
    }
}

pub struct SinkRunner<K: Sink> {
    node: K,
    instance: Instance<K::State>,
    gate: Gate,
}

impl<K: Sink> SinkRunner<K> {
    pub fn new(node_id: impl Into<String>, node: K) -> Self {
        Self {
            node,
            instance: Instance::new(node_id.into()),
            gate: Gate::default(),
        }
    }

    pub fn with_inputs<I, P>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PortId>,
    {
        self.gate.declared = Some(ports.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mode(mut self, mode: usize) -> Self {
        self.instance.context.mode = mode;
        self
    }

    pub fn initialize(&mut self, configuration: &ConfigurationMap) -> NodeResult<()> {
        let node = &self.node;
        self.instance.initialize(|| node.initialize(configuration))?;
        let (_, state) = self.instance.parts()?;
        self.gate.declare(node.input_ports(state)?);
        Ok(())
    }

    pub fn gate(&mut self, tokens: Vec<Token>) -> NodeResult<bool> {
        check_gate_allowed(&self.instance.context.node_id, self.instance.lifecycle)?;
        let tokens = self.gate.order(tokens)?;
        let (context, state) = self.instance.parts()?;
        let admitted = self.node.input_rule(context, state, &tokens)?;
        debug!(node = %context.node_id, cycle = context.cycle, admitted, "input rule evaluated");

        if admitted {
            self.gate.admit(tokens);
            self.instance.lifecycle.transition_to(LifecycleState::Admitted)?;
        }
        Ok(admitted)
    }

    pub fn run(&mut self) -> NodeResult<()> {
        check_run_allowed(&self.instance.context.node_id, self.instance.lifecycle)?;
        let inputs = self.gate.take()?;
        let node = &self.node;
        self.instance
            .execute(|context, state| node.run(context, state, inputs))
    }

    /// Gate then run. Returns whether the sink ran.
    pub fn cycle(&mut self, tokens: Vec<Token>) -> NodeResult<bool> {
        if !self.gate(tokens)? {
            return Ok(false);
        }
        self.run()?;
        Ok(true)
    }

    pub fn context(&self) -> &Context {
        &self.instance.context
    }

    pub fn state(&self) -> Option<&K::State> {
        self.instance.state.as_ref()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.instance.lifecycle
    }

    pub fn tear_down(self) {
        self.instance.tear_down();
    }
}
