use super::erased::RegisteredNode;
use crate::core::PortId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Source,
    Operator,
    Sink,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Operator => "operator",
            Self::Sink => "sink",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata describing a port (input or output)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMetadata {
    pub id: PortId,
    pub data_type: String,
}

/// Factory function type for creating node instances
pub type NodeFactory = fn() -> RegisteredNode;

/// Complete metadata for a node type
#[derive(Clone)]
pub struct NodeMetadata {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub inputs: Vec<PortMetadata>,
    pub outputs: Vec<PortMetadata>,
    pub factory: NodeFactory,
}

impl NodeMetadata {
    /// Create a new instance of this node type
    pub fn create_instance(&self) -> RegisteredNode {
        (self.factory)()
    }

    /// Declared input ports, in declaration order.
    pub fn input_ports(&self) -> Vec<PortId> {
        self.inputs.iter().map(|port| port.id.clone()).collect()
    }
}

impl fmt::Debug for NodeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMetadata")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

// Factory type for creating node metadata at runtime
pub type NodeMetadataFactory = fn() -> NodeMetadata;

// Wrapper for inventory collection
pub struct NodeMetadataFactoryWrapper(pub NodeMetadataFactory);

inventory::collect!(NodeMetadataFactoryWrapper);
