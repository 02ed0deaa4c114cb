//! Compile-time registry of node types.
//!
//! Nodes register themselves with `#[derive(FlowNode)]`; the derive submits a
//! [`NodeMetadata`] factory to `inventory`, which this module collects.

pub mod erased;
pub mod metadata;

pub use erased::{AnyState, DynOperator, DynSink, DynSource, RegisteredNode};
pub use metadata::{
    NodeFactory, NodeKind, NodeMetadata, NodeMetadataFactory, NodeMetadataFactoryWrapper,
    PortMetadata,
};

use crate::core::{NodeDescriptor, NodeError, NodeResult};
use crate::engine::{OperatorRunner, SinkRunner, SourceRunner};

/// All registered node types.
pub fn all() -> Vec<NodeMetadata> {
    inventory::iter::<NodeMetadataFactoryWrapper>
        .into_iter()
        .map(|wrapper| (wrapper.0)())
        .collect()
}

pub fn find(id: &str) -> Option<NodeMetadata> {
    inventory::iter::<NodeMetadataFactoryWrapper>
        .into_iter()
        .map(|wrapper| (wrapper.0)())
        .find(|metadata| metadata.id == id)
}

/// An initialized node instance of any kind.
pub enum NodeInstance {
    Source(SourceRunner<Box<dyn DynSource>>),
    Operator(OperatorRunner<Box<dyn DynOperator>>),
    Sink(SinkRunner<Box<dyn DynSink>>),
}

impl NodeInstance {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Source(_) => NodeKind::Source,
            Self::Operator(_) => NodeKind::Operator,
            Self::Sink(_) => NodeKind::Sink,
        }
    }

    pub fn node_id(&self) -> &str {
        match self {
            Self::Source(runner) => &runner.context().node_id,
            Self::Operator(runner) => &runner.context().node_id,
            Self::Sink(runner) => &runner.context().node_id,
        }
    }

    pub fn into_source(self) -> NodeResult<SourceRunner<Box<dyn DynSource>>> {
        match self {
            Self::Source(runner) => Ok(runner),
            other => Err(other.kind_mismatch(NodeKind::Source)),
        }
    }

    pub fn into_operator(self) -> NodeResult<OperatorRunner<Box<dyn DynOperator>>> {
        match self {
            Self::Operator(runner) => Ok(runner),
            other => Err(other.kind_mismatch(NodeKind::Operator)),
        }
    }

    pub fn into_sink(self) -> NodeResult<SinkRunner<Box<dyn DynSink>>> {
        match self {
            Self::Sink(runner) => Ok(runner),
            other => Err(other.kind_mismatch(NodeKind::Sink)),
        }
    }

    fn kind_mismatch(&self, expected: NodeKind) -> NodeError {
        NodeError::KindMismatch {
            node: self.node_id().to_string(),
            expected: expected.to_string(),
            actual: self.kind().to_string(),
        }
    }
}

/// Creates and initializes the node a descriptor names.
///
/// Gated nodes get their declared input ports, so tokens are checked against
/// them on every gate evaluation.
pub fn instantiate(descriptor: &NodeDescriptor) -> NodeResult<NodeInstance> {
    let metadata =
        find(&descriptor.node).ok_or_else(|| NodeError::UnknownNode(descriptor.node.clone()))?;
    let configuration = descriptor.configuration_map()?;
    let inputs = metadata.input_ports();

    let instance = match metadata.create_instance() {
        RegisteredNode::Source(node) => {
            let mut runner = SourceRunner::new(&descriptor.id, node);
            runner.initialize(&configuration)?;
            NodeInstance::Source(runner)
        }
        RegisteredNode::Operator(node) => {
            let mut runner = OperatorRunner::new(&descriptor.id, node).with_inputs(inputs);
            runner.initialize(&configuration)?;
            NodeInstance::Operator(runner)
        }
        RegisteredNode::Sink(node) => {
            let mut runner = SinkRunner::new(&descriptor.id, node).with_inputs(inputs);
            runner.initialize(&configuration)?;
            NodeInstance::Sink(runner)
        }
    };

    Ok(instance)
}
