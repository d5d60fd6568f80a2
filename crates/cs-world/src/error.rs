use cs_core::NodeId;
use cs_dispatch::DispatchError;
use cs_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("node {0} is not part of the road network")]
    UnknownNode(NodeId),

    #[error("invalid vehicle: {0}")]
    InvalidVehicle(#[from] DispatchError),

    #[error("depot capacity must be positive")]
    ZeroDepotCapacity,

    #[error("a depot already stands on node {0}")]
    DuplicateDepot(NodeId),

    #[error("routing error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type WorldResult<T> = Result<T, WorldError>;
