use crate::codec::{decode_text, Terminator, TERMINATOR};
use crate::console::{Console, StdConsole};
use crate::core::{ConfigurationMap, Context, Data, Input, NodeResult, Sink, Token};
use crate::rules::{InputRule, RulePolicy};
use flowplug_macros::FlowNode;
use std::sync::Arc;

/// Displays every received payload on a console.
///
/// Terminated UTF-8 payloads are shown as text, with the terminator removed
/// unless `strip_terminator` is `false`. Any other payload is shown as its
/// byte list.
#[derive(FlowNode, Clone)]
#[node_meta(name = "Console Sink", kind = "sink")]
pub struct ConsoleSink {
    #[input(data_type = "text")]
    _fizz: (),

    console: Arc<dyn Console>,
}

impl ConsoleSink {
    pub fn new(console: impl Console + 'static) -> Self {
        Self {
            _fizz: (),
            console: Arc::new(console),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(StdConsole::new())
    }
}

/// Append-only record of displayed values.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, value: String) {
        self.entries.push(value);
    }
}

#[derive(Debug)]
pub struct ConsoleSinkState {
    terminator: Terminator,
    rule: RulePolicy,
    history: History,
}

impl ConsoleSinkState {
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }
}

/// Renders a payload the way the sink displays it.
pub fn render(data: &Data, terminator: Terminator) -> String {
    let bytes = data.as_bytes();
    if bytes.last() == Some(&TERMINATOR) {
        if let Ok(text) = decode_text(bytes, terminator) {
            return text;
        }
    }
    format!("{:?}", bytes)
}

impl Sink for ConsoleSink {
    type State = ConsoleSinkState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State> {
        let strip = configuration.parse_or("strip_terminator", true)?;
        Ok(ConsoleSinkState {
            terminator: if strip {
                Terminator::Strip
            } else {
                Terminator::Keep
            },
            rule: RulePolicy::from_configuration(configuration)?,
            history: History::default(),
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
        inputs: Vec<Input>,
    ) -> NodeResult<()> {
        for input in inputs {
            let value = render(&input.data, state.terminator);
            self.console
                .write_line(&format!("Received on <{}>: {}", input.port_id, value))?;
            state.history.record(value);
        }
        Ok(())
    }
}
