use thiserror::Error;

/// Canonical result for node operations.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("length mismatch decoding {type_name}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("text payload is missing its trailing terminator")]
    MissingTerminator,

    #[error("text payload is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid configuration for `{key}`: {reason}")]
    Configuration { key: String, reason: String },

    #[error("decode failed: {0}")]
    Codec(#[from] CodecError),

    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("no input received on port `{0}`")]
    MissingInput(String),

    #[error("rejected external input: {0}")]
    ExternalInput(String),

    #[error("external input closed")]
    InputClosed,

    #[error("node state is not a `{expected}`")]
    StateMismatch { expected: &'static str },

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("unknown node type: {0}")]
    UnknownNode(String),

    #[error("node `{node}` is a {actual}, expected a {expected}")]
    KindMismatch {
        node: String,
        expected: String,
        actual: String,
    },

    #[error("invalid node descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error ends the node's activity rather than only the current cycle.
    ///
    /// Rejected external input is reported and the next cycle proceeds; every
    /// other failure is a programmer or environment error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ExternalInput(_))
    }
}
