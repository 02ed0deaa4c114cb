use crate::codec::{self, encode_text};
use crate::core::{
    find_input, ConfigurationMap, Context, Input, InputPorts, NodeError, NodeResult, Operator,
    Output, PortId, Token,
};
use crate::rules::{InputRule, RulePolicy};
use flowplug_macros::FlowNode;

pub const FIZZ_PORT: &str = "fizz";

/// Emits `"(<tag>) fizz"` for even numbers and an empty text for odd ones.
///
/// Configuration: `input` (port carrying the `u64`, default `number`), `inputs`
/// (comma-separated ports to declare, must contain `input`), `tag` (default
/// `rust`), `input_rule`. A custom `input` without `inputs` leaves the ports to
/// the host.
#[derive(FlowNode, Debug, Clone, Default)]
#[node_meta(name = "Fizz", kind = "operator")]
pub struct FizzOperator {
    #[input(data_type = "u64")]
    _number: (),

    #[output(data_type = "text")]
    _fizz: (),
}

impl FizzOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub struct FizzState {
    input: PortId,
    ports: InputPorts,
    label: String,
    rule: RulePolicy,
}

impl FizzState {
    pub fn input_port(&self) -> &PortId {
        &self.input
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

fn configured_ports(configuration: &ConfigurationMap, input: &PortId) -> NodeResult<InputPorts> {
    let Some(raw) = configuration.get("inputs") else {
        return Ok(match configuration.get("input") {
            None => InputPorts::Registered,
            Some(_) => InputPorts::Open,
        });
    };

    let ports: Vec<PortId> = raw
        .split(',')
        .map(str::trim)
        .filter(|port| !port.is_empty())
        .map(PortId::from)
        .collect();
    if !ports.contains(input) {
        return Err(NodeError::configuration(
            "inputs",
            format!("`{}` does not list the input port `{}`", raw, input),
        ));
    }
    Ok(InputPorts::Declared(ports))
}

impl Operator for FizzOperator {
    type State = FizzState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State> {
        let tag = configuration.get_or("tag", "rust");
        let input = PortId::from(configuration.get_or("input", "number"));
        Ok(FizzState {
            ports: configured_ports(configuration, &input)?,
            input,
            label: format!("({}) fizz", tag),
            rule: RulePolicy::from_configuration(configuration)?,
        })
    }

    fn input_ports(&self, state: &Self::State) -> NodeResult<InputPorts> {
        Ok(state.ports.clone())
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
        inputs: Vec<Input>,
    ) -> NodeResult<Vec<Output>> {
        let input = find_input(&inputs, state.input.as_str())
            .ok_or_else(|| NodeError::MissingInput(state.input.to_string()))?;
        let number: u64 = codec::decode(input.data.as_bytes())?;

        let text = if number % 2 == 0 { state.label.as_str() } else { "" };
        Ok(vec![Output::new(FIZZ_PORT, encode_text(text))])
    }
}
