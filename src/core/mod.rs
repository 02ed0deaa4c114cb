pub mod config;
pub mod data;
pub mod error;
pub mod node;

pub use config::{ConfigurationMap, NodeDescriptor};
pub use data::{find_input, Data, Input, Output, PortId, Token, TokenStatus};
pub use error::{CodecError, NodeError, NodeResult};
pub use node::{Context, InputPorts, Operator, Sink, Source};
