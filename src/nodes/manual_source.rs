use crate::codec;
use crate::console::{Console, StdConsole};
use crate::core::{ConfigurationMap, Context, Data, NodeError, NodeResult, Output, Source};
use flowplug_macros::FlowNode;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub const TICK_PORT: &str = "tick";
pub const NUMBER_PORT: &str = "number";

const LAUNCH_BANNER: &str = "[WAITING FOR USER INPUT BEFORE LAUNCHING]";
const TICK_PROMPT: &str = "Press ENTER: ";
const NUMBER_PROMPT: &str = "Enter a number: ";

/// Source driven by a human at a console.
///
/// The first run waits for one line before launching. Every run then reads
/// one line and emits exactly one output on the port chosen by the `port`
/// setting: on `tick` (default) an empty line emits a one-byte tick, on
/// `number` a non-negative integer is emitted as a `u64`. Any other line is
/// rejected.
#[derive(FlowNode, Clone)]
#[node_meta(name = "Manual Source", kind = "source")]
pub struct ManualSource {
    #[output(data_type = "u8")]
    _tick: (),

    #[output(data_type = "u64")]
    _number: (),

    console: Arc<dyn Console>,
}

impl ManualSource {
    pub fn new(console: impl Console + 'static) -> Self {
        Self {
            _tick: (),
            _number: (),
            console: Arc::new(console),
        }
    }

    fn read_line(&self) -> NodeResult<String> {
        self.console.read_line()?.ok_or(NodeError::InputClosed)
    }
}

impl Default for ManualSource {
    fn default() -> Self {
        Self::new(StdConsole::new())
    }
}

/// The single port a configured source emits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryPort {
    #[default]
    Tick,
    Number,
}

impl EntryPort {
    pub fn port_id(&self) -> &'static str {
        match self {
            Self::Tick => TICK_PORT,
            Self::Number => NUMBER_PORT,
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Self::Tick => TICK_PROMPT,
            Self::Number => NUMBER_PROMPT,
        }
    }

    /// Turns one console line into this port's payload.
    pub fn parse(&self, line: &str) -> NodeResult<Data> {
        let line = line.trim();
        match self {
            Self::Tick if line.is_empty() => Ok(Data::from(vec![1u8])),
            Self::Tick => Err(NodeError::ExternalInput(format!(
                "expected an empty line, got `{}`",
                line
            ))),
            Self::Number => line.parse::<u64>().map(codec::encode).map_err(|e| {
                NodeError::ExternalInput(format!("`{}` is not a non-negative integer: {}", line, e))
            }),
        }
    }
}

impl FromStr for EntryPort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            TICK_PORT => Ok(Self::Tick),
            NUMBER_PORT => Ok(Self::Number),
            other => Err(format!("unknown port `{}`, expected tick or number", other)),
        }
    }
}

impl fmt::Display for EntryPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.port_id())
    }
}

#[derive(Debug)]
pub struct ManualSourceState {
    port: EntryPort,
    awaiting_launch: bool,
    emitted: u64,
}

impl ManualSourceState {
    pub fn port(&self) -> EntryPort {
        self.port
    }

    pub fn is_launched(&self) -> bool {
        !self.awaiting_launch
    }

    /// Number of outputs emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn launch(&mut self) {
        self.awaiting_launch = false;
    }

    fn record_emit(&mut self) {
        self.emitted += 1;
    }
}

impl Source for ManualSource {
    type State = ManualSourceState;

    fn initialize(&self, configuration: &ConfigurationMap) -> NodeResult<Self::State> {
        Ok(ManualSourceState {
            port: configuration.parse_or("port", EntryPort::Tick)?,
            awaiting_launch: configuration.parse_or("launch_prompt", true)?,
            emitted: 0,
        })
    }

    fn run(&self, context: &mut Context, state: &mut Self::State) -> NodeResult<Vec<Output>> {
        if state.awaiting_launch {
            self.console.write_line(LAUNCH_BANNER)?;
            self.read_line()?;
            state.launch();
        }

        self.console.prompt(state.port.prompt())?;
        let data = state.port.parse(&self.read_line()?)?;
        debug!(node = %context.node_id, port = %state.port, bytes = data.len(), "console entry");

        state.record_emit();
        Ok(vec![Output::new(state.port.port_id(), data)])
    }
}
