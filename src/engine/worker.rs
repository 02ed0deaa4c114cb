use super::runner::SourceRunner;
use crate::core::{NodeError, NodeResult, Output, Source};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{info, warn};

/// Runs a source on its own OS thread so that a source blocked on external
/// input cannot stall anything else.
///
/// Every cycle's result is sent over a bounded channel. Rejected external
/// input is reported and the loop continues; closed input, a fatal error or a
/// dropped receiver ends it. There is no cancellation: `stop` only prevents the
/// next cycle from starting.
pub struct SourceWorker {
    node_id: String,
    outputs: Receiver<NodeResult<Vec<Output>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SourceWorker {
    /// Spawns the worker thread. The runner must already be initialized.
    pub fn spawn<S>(mut runner: SourceRunner<S>, capacity: usize) -> NodeResult<Self>
    where
        S: Source + 'static,
        S::State: 'static,
    {
        let node_id = runner.context().node_id.clone();
        let (tx, rx) = bounded(capacity);
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let thread_node_id = node_id.clone();

        let handle = std::thread::Builder::new()
            .name(format!("source-{}", node_id))
            .spawn(move || {
                while flag.load(Ordering::Relaxed) {
                    match runner.run() {
                        Ok(outputs) => {
                            if tx.send(Ok(outputs)).is_err() {
                                break;
                            }
                        }
                        Err(NodeError::InputClosed) => {
                            info!(node = %thread_node_id, "external input closed");
                            break;
                        }
                        Err(e) if !e.is_fatal() => {
                            warn!(node = %thread_node_id, error = %e, "cycle rejected");
                            if tx.send(Err(e)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
                flag.store(false, Ordering::Relaxed);
                runner.tear_down();
            })?;

        Ok(Self {
            node_id,
            outputs: rx,
            running,
            handle: Some(handle),
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Blocks until the next cycle result. `None` once the source has finished.
    pub fn recv(&self) -> Option<NodeResult<Vec<Output>>> {
        self.outputs.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<NodeResult<Vec<Output>>> {
        match self.outputs.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Channel handle, e.g. for `select!` or for moving into another task.
    pub fn outputs(&self) -> &Receiver<NodeResult<Vec<Output>>> {
        &self.outputs
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Prevents further cycles and waits for the thread if it has finished.
    /// A thread still blocked on input is detached.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }

    /// Waits for the source to finish on its own, e.g. after its input closed.
    /// Results not yet received are discarded.
    pub fn join(mut self) {
        drop(std::mem::replace(&mut self.outputs, crossbeam_channel::never()));
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(node = %self.node_id, "source thread panicked");
            }
        }
    }
}

impl Drop for SourceWorker {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
