use super::Console;
use crate::core::NodeResult;
use std::io::{self, BufRead, Write};

/// Console backed by the process standard input and output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn read_line(&self) -> NodeResult<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write_line(&self, line: &str) -> NodeResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn prompt(&self, text: &str) -> NodeResult<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}
