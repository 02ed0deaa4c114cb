pub mod lifecycle;
pub mod runner;
pub mod worker;

pub use lifecycle::LifecycleState;
pub use runner::{OperatorRunner, SinkRunner, SourceRunner};
pub use worker::SourceWorker;
