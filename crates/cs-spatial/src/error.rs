//! Spatial-subsystem error type.

use thiserror::Error;

use cs_core::NodeId;

/// Errors produced by `cs-spatial`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
