use super::config::ConfigurationMap;
use super::data::{Input, Output, PortId, Token};
use super::error::NodeResult;
use crate::rules::{AllReady, InputRule};
use serde::{Deserialize, Serialize};

/// Per-instance execution context handed to every gate and run call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Identifier of the node instance.
    pub node_id: String,

    /// Execution mode as supplied by the host.
    pub mode: usize,

    /// Number of runs attempted by this instance, failed ones included.
    pub cycle: u64,
}

impl Context {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            mode: 0,
            cycle: 0,
        }
    }
}

/// Input ports a node declares once its configuration is known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputPorts {
    /// Keep the ports the runner was built with, e.g. the registered ones.
    #[default]
    Registered,
    /// Tokens are validated and ordered against exactly these ports.
    Declared(Vec<PortId>),
    /// The host decides the ports; tokens pass through unchecked.
    Open,
}

/// Node producing outputs without consuming inputs.
///
/// `run` may block the calling thread on an external trigger; hosts are
/// expected to give every source its own thread.
pub trait Source: Send + Sync {
    type State: Send;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State>;

    fn run(&self, context: &mut Context, state: &mut Self::State) -> NodeResult<Vec<Output>>;
}

/// Node consuming admitted inputs and producing zero or more outputs.
pub trait Operator: Send + Sync {
    type State: Send;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State>;

    /// Ports declared by the configured instance, queried right after `initialize`.
    fn input_ports(&self, _state: &Self::State) -> NodeResult<InputPorts> {
        Ok(InputPorts::Registered)
    }

    /// Decides whether this cycle runs. Observes the state, never mutates it.
    fn input_rule(
        &self,
        _context: &Context,
        _state: &Self::State,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        Ok(AllReady.admit(tokens))
    }

    fn run(
        &self,
        context: &mut Context,
        state: &mut Self::State,
        inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>>;
}

/// Node consuming admitted inputs purely for side effects.
pub trait Sink: Send + Sync {
    type State: Send;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State>;

    /// Ports declared by the configured instance, queried right after `initialize`.
    fn input_ports(&self, _state: &Self::State) -> NodeResult<InputPorts> {
        Ok(InputPorts::Registered)
    }

    /// Decides whether this cycle runs. Observes the state, never mutates it.
    fn input_rule(
        &self,
        _context: &Context,
        _state: &Self::State,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        Ok(AllReady.admit(tokens))
    }

    fn run(
        &self,
        context: &mut Context,
        state: &mut Self::State,
        inputs: Vec<Input>,
    ) -> NodeResult<()>;
}
