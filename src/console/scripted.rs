use super::Console;
use crate::core::NodeResult;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Console replaying queued input lines and recording everything written.
///
/// Clones share the same queue and transcript, so a test can keep one handle
/// while the node owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    inner: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    input: VecDeque<String>,
    written: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        console.push_lines(lines);
        console
    }

    pub fn push_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().input.extend(lines.into_iter().map(Into::into));
    }

    /// Lines not yet consumed by `read_line`.
    pub fn remaining(&self) -> usize {
        self.lock().input.len()
    }

    /// Everything written so far, prompts included.
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panic while holding the lock leaves the script itself intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Console for ScriptedConsole {
    fn read_line(&self) -> NodeResult<Option<String>> {
        Ok(self.lock().input.pop_front())
    }

    fn write_line(&self, line: &str) -> NodeResult<()> {
        self.lock().written.push(line.to_string());
        Ok(())
    }
}
