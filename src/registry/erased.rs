//! Type-erased node handles.
//!
//! The typed traits carry their state as an associated type, which keeps them
//! out of trait objects. The `Dyn*` traits box the state as [`AnyState`] and are
//! implemented for every typed node; `Box<dyn Dyn*>` in turn implements the
//! typed trait again, so the same runners drive registered nodes.

use super::metadata::NodeKind;
use crate::core::{
    ConfigurationMap, Context, Input, InputPorts, NodeError, NodeResult, Operator, Output, Sink,
    Source, Token,
};
use std::any::Any;

pub type AnyState = Box<dyn Any + Send>;

fn state_ref<S: 'static>(state: &AnyState) -> NodeResult<&S> {
    (**state).downcast_ref::<S>().ok_or(NodeError::StateMismatch {
        expected: std::any::type_name::<S>(),
    })
}

fn state_mut<S: 'static>(state: &mut AnyState) -> NodeResult<&mut S> {
    (**state).downcast_mut::<S>().ok_or(NodeError::StateMismatch {
        expected: std::any::type_name::<S>(),
    })
}

pub trait DynSource: Send + Sync {
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState>;

    fn run_erased(&self, context: &mut Context, state: &mut AnyState) -> NodeResult<Vec<Output>>;
}

impl<T> DynSource for T
where
    T: Source,
    T::State: 'static,
{
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        Ok(Box::new(self.initialize(configuration)?))
    }

    fn run_erased(&self, context: &mut Context, state: &mut AnyState) -> NodeResult<Vec<Output>> {
        self.run(context, state_mut::<T::State>(state)?)
    }
}

impl Source for Box<dyn DynSource> {
    type State = AnyState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        (**self).initialize_erased(configuration)
    }

    fn run(&self, context: &mut Context, state: &mut AnyState) -> NodeResult<Vec<Output>> {
        (**self).run_erased(context, state)
    }
}

pub trait DynOperator: Send + Sync {
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState>;

    fn input_ports_erased(&self, state: &AnyState) -> NodeResult<InputPorts>;

    fn input_rule_erased(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool>;

    fn run_erased(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>>;
}

impl<T> DynOperator for T
where
    T: Operator,
    T::State: 'static,
{
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        Ok(Box::new(self.initialize(configuration)?))
    }

    fn input_ports_erased(&self, state: &AnyState) -> NodeResult<InputPorts> {
        self.input_ports(state_ref::<T::State>(state)?)
    }

    fn input_rule_erased(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        self.input_rule(context, state_ref::<T::State>(state)?, tokens)
    }

    fn run_erased(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>> {
        self.run(context, state_mut::<T::State>(state)?, inputs)
    }
}

impl Operator for Box<dyn DynOperator> {
    type State = AnyState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        (**self).initialize_erased(configuration)
    }

    fn input_ports(&self, state: &AnyState) -> NodeResult<InputPorts> {
        (**self).input_ports_erased(state)
    }

    fn input_rule(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        (**self).input_rule_erased(context, state, tokens)
    }

    fn run(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>> {
        (**self).run_erased(context, state, inputs)
    }
}

pub trait DynSink: Send + Sync {
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState>;

    fn input_ports_erased(&self, state: &AnyState) -> NodeResult<InputPorts>;

    fn input_rule_erased(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool>;

    fn run_erased(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<()>;
}

impl<T> DynSink for T
where
    T: Sink,
    T::State: 'static,
{
    fn initialize_erased(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        Ok(Box::new(self.initialize(configuration)?))
    }

    fn input_ports_erased(&self, state: &AnyState) -> NodeResult<InputPorts> {
        self.input_ports(state_ref::<T::State>(state)?)
    }

    fn input_rule_erased(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        self.input_rule(context, state_ref::<T::State>(state)?, tokens)
    }

    fn run_erased(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<()> {
        self.run(context, state_mut::<T::State>(state)?, inputs)
    }
}

impl Sink for Box<dyn DynSink> {
    type State = AnyState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<AnyState> {
        (**self).initialize_erased(configuration)
    }

    fn input_ports(&self, state: &AnyState) -> NodeResult<InputPorts> {
        (**self).input_ports_erased(state)
    }

    fn input_rule(
        &self,
        context: &Context,
        state: &AnyState,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        (**self).input_rule_erased(context, state, tokens)
    }

    fn run(
        &self,
        context: &mut Context,
        state: &mut AnyState,
        inputs: Vec<Input>,
    ) -> NodeResult<()> {
        (**self).run_erased(context, state, inputs)
    }
}

/// A node produced by a registry factory.
pub enum RegisteredNode {
    Source(Box<dyn DynSource>),
    Operator(Box<dyn DynOperator>),
    Sink(Box<dyn DynSink>),
}

impl RegisteredNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Source(_) => NodeKind::Source,
            Self::Operator(_) => NodeKind::Operator,
            Self::Sink(_) => NodeKind::Sink,
        }
    }
}
