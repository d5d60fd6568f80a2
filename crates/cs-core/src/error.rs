//! Core error types.
//!
//! `CoreError` covers configuration and parsing problems surfaced at build
//! time.  `PdpError` is returned by the parcel registry's mutation
//! primitives (pickup, deliver, drop, load); the dispatch core treats every
//! `PdpError` as a local no-op rather than a failure.

use thiserror::Error;

use crate::{DepotId, NodeId, ParcelId, VehicleId};

/// Configuration and validation errors shared by all `cs-*` crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for configuration paths.
pub type CoreResult<T> = Result<T, CoreError>;

/// Refusals from the pickup-and-delivery registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdpError {
    #[error("parcel {0} is not known to the registry")]
    UnknownParcel(ParcelId),

    #[error("vehicle {0} is not known to the registry")]
    UnknownVehicle(VehicleId),

    #[error("parcel {parcel} is {actual}, expected {expected}")]
    WrongState {
        parcel:   ParcelId,
        expected: &'static str,
        actual:   &'static str,
    },

    #[error("vehicle {vehicle} is not at {node}")]
    NotAtLocation { vehicle: VehicleId, node: NodeId },

    #[error("vehicle {vehicle} has {free} free capacity, parcel {parcel} needs {needed}")]
    InsufficientCapacity {
        vehicle: VehicleId,
        parcel:  ParcelId,
        needed:  u32,
        free:    u32,
    },

    #[error("no depot at the position of vehicle {0}")]
    NoDepotHere(VehicleId),

    #[error("depot {0} is full")]
    DepotFull(DepotId),
}

pub type PdpResult<T> = Result<T, PdpError>;
