//! External prompt and display channel used by source and sink nodes.
//!
//! Nodes receive a [`Console`] at construction instead of touching process
//! stdio directly, so tests can substitute a scripted one.

pub mod scripted;
pub mod stdio;

pub use scripted::ScriptedConsole;
pub use stdio::StdConsole;

use crate::core::NodeResult;

pub trait Console: Send + Sync {
    /// Blocks until a full line is available. Returns `None` at end of input.
    /// The trailing newline is not included.
    fn read_line(&self) -> NodeResult<Option<String>>;

    fn write_line(&self, line: &str) -> NodeResult<()>;

    /// Writes without a trailing newline, e.g. before reading an answer.
    fn prompt(&self, text: &str) -> NodeResult<()> {
        self.write_line(text)
    }
}
