use crate::codec;
use crate::core::{ConfigurationMap, Context, Input, NodeResult, Operator, Output, Token};
use crate::rules::{InputRule, RulePolicy};
use flowplug_macros::FlowNode;

pub const COUNT_PORT: &str = "count";

/// Counts the cycles it ran and emits the running count as a `u64`.
#[derive(FlowNode, Debug, Clone, Default)]
#[node_meta(name = "Counter", kind = "operator")]
pub struct CounterOperator {
    #[input(data_type = "u8")]
    _tick: (),

    #[output(data_type = "u64")]
    _count: (),
}

impl CounterOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Monotonic counter; saturates instead of wrapping.
#[derive(Debug, Default)]
pub struct Counter {
    count: u64,
    rule: RulePolicy,
}

impl Counter {
    pub fn count(&self) -> u64 {
        self.count
    }

    fn increment(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}

impl Operator for CounterOperator {
    type State = Counter;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State> {
        Ok(Counter {
            count: configuration.parse_or("start", 0u64)?,
            rule: RulePolicy::from_configuration(configuration)?,
        })
    }

    fn input_rule(
        &self,
        _context: &Context,
        state: &Self::State,
        tokens: &[Token],
    ) -> NodeResult<bool> {
        Ok(state.rule.admit(tokens))
    }

    fn run(
        &self,
        _context: &mut Context,
        state: &mut Self::State,
        _inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>> {
        let count = state.increment();
        Ok(vec![Output::new(COUNT_PORT, codec::encode(count))])
    }
}
