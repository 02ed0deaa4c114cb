use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of an input or output port, as declared by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(Arc<str>);

impl PortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for PortId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl PartialEq<str> for PortId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for PortId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque payload crossing the node boundary. Only codec logic interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data(Bytes);

impl Data {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Data {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

impl AsRef<[u8]> for Data {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    Ready,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Readiness {
    Ready { data: Data, timestamp: u64 },
    Pending,
}

/// Per-port readiness signal handed to the input rule.
///
/// A payload is attached if and only if the token is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    port_id: PortId,
    readiness: Readiness,
}

impl Token {
    pub fn ready(port_id: impl Into<PortId>, data: impl Into<Data>) -> Self {
        Self::ready_at(port_id, data, 0)
    }

    pub fn ready_at(port_id: impl Into<PortId>, data: impl Into<Data>, timestamp: u64) -> Self {
        Self {
            port_id: port_id.into(),
            readiness: Readiness::Ready {
                data: data.into(),
                timestamp,
            },
        }
    }

    pub fn pending(port_id: impl Into<PortId>) -> Self {
        Self {
            port_id: port_id.into(),
            readiness: Readiness::Pending,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn status(&self) -> TokenStatus {
        match self.readiness {
            Readiness::Ready { .. } => TokenStatus::Ready,
            Readiness::Pending => TokenStatus::Pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == TokenStatus::Ready
    }

    pub fn data(&self) -> Option<&Data> {
        match &self.readiness {
            Readiness::Ready { data, .. } => Some(data),
            Readiness::Pending => None,
        }
    }

    /// Converts a ready token into the input delivered to `run`.
    pub fn into_input(self) -> Option<Input> {
        match self.readiness {
            Readiness::Ready { data, timestamp } => Some(Input {
                port_id: self.port_id,
                data,
                timestamp,
            }),
            Readiness::Pending => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub port_id: PortId,
    pub data: Data,
    pub timestamp: u64,
}

impl Input {
    pub fn new(port_id: impl Into<PortId>, data: impl Into<Data>) -> Self {
        Self {
            port_id: port_id.into(),
            data: data.into(),
            timestamp: 0,
        }
    }
}

/// Payload produced by `run`, tagged with the port the host routes it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub port_id: PortId,
    pub data: Data,
}

impl Output {
    pub fn new(port_id: impl Into<PortId>, data: impl Into<Data>) -> Self {
        Self {
            port_id: port_id.into(),
            data: data.into(),
        }
    }
}

/// Finds the input addressed to `port_id`.
pub fn find_input<'a>(inputs: &'a [Input], port_id: &str) -> Option<&'a Input> {
    inputs.iter().find(|input| input.port_id == port_id)
}
