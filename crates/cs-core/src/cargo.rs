//! Parcel, depot and position records shared by the dispatch core and the
//! world that implements its collaborators.

use std::fmt;

use crate::{DepotId, EdgeId, NodeId, ParcelId, VehicleId};

// ── Parcel ────────────────────────────────────────────────────────────────────

/// An immutable description of one unit of cargo.
///
/// `Parcel` is `Copy`: vehicles keep a copy of their committed parcel so the
/// pickup and delivery nodes remain known even after the registry forgets it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    pub id:                   ParcelId,
    pub pickup:               NodeId,
    pub delivery:             NodeId,
    /// Capacity units occupied while carried.  Always ≥ 1.
    pub needed_capacity:      u32,
    pub pickup_duration_ms:   u64,
    pub delivery_duration_ms: u64,
}

impl Parcel {
    /// A parcel with instantaneous pickup and delivery.
    pub fn new(id: ParcelId, pickup: NodeId, delivery: NodeId, needed_capacity: u32) -> Self {
        Self {
            id,
            pickup,
            delivery,
            needed_capacity: needed_capacity.max(1),
            pickup_duration_ms: 0,
            delivery_duration_ms: 0,
        }
    }

    /// Set both service durations.
    pub fn with_service(mut self, pickup_ms: u64, delivery_ms: u64) -> Self {
        self.pickup_duration_ms = pickup_ms;
        self.delivery_duration_ms = delivery_ms;
        self
    }
}

// ── ParcelState ───────────────────────────────────────────────────────────────

/// Lifecycle of a parcel.
///
/// Transitions only move forward:
///
/// ```text
/// Available ──pickup──▶ InCargo ──deliver──▶ Delivered
///                          │  ▲
///                     drop │  │ load
///                          ▼  │
///                        AtDepot
/// ```
///
/// `AtDepot → InCargo` is the only edge that re-enters an earlier variant,
/// and it is only taken by a depot load; nothing ever returns to `Available`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParcelState {
    Available,
    InCargo(VehicleId),
    AtDepot(DepotId),
    Delivered,
}

impl ParcelState {
    pub fn as_str(self) -> &'static str {
        match self {
            ParcelState::Available  => "available",
            ParcelState::InCargo(_) => "in cargo",
            ParcelState::AtDepot(_) => "at depot",
            ParcelState::Delivered  => "delivered",
        }
    }

    /// `true` if the transition `self → next` is allowed by the lifecycle.
    pub fn can_become(self, next: ParcelState) -> bool {
        matches!(
            (self, next),
            (ParcelState::Available, ParcelState::InCargo(_))
                | (ParcelState::InCargo(_), ParcelState::AtDepot(_))
                | (ParcelState::InCargo(_), ParcelState::Delivered)
                | (ParcelState::AtDepot(_), ParcelState::InCargo(_))
        )
    }
}

impl fmt::Display for ParcelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Depot ─────────────────────────────────────────────────────────────────────

/// A fixed hand-off site between pickup and delivery vehicles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Depot {
    pub id:       DepotId,
    pub node:     NodeId,
    /// Total needed-capacity the buffer may hold.
    pub capacity: u32,
}

// ── Container ─────────────────────────────────────────────────────────────────

/// Anything that can hold parcels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Vehicle(VehicleId),
    Depot(DepotId),
}

impl From<VehicleId> for Container {
    fn from(v: VehicleId) -> Self {
        Container::Vehicle(v)
    }
}

impl From<DepotId> for Container {
    fn from(d: DepotId) -> Self {
        Container::Depot(d)
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// Where a vehicle is on the road graph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Position {
    /// Exactly at a node.
    Node(NodeId),
    /// Part-way along a directed edge, `offset_m` metres from its source.
    OnEdge { edge: EdgeId, offset_m: f64 },
}

impl Position {
    /// The node the vehicle stands on, if it is not mid-edge.
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Position::Node(n) => Some(n),
            Position::OnEdge { .. } => None,
        }
    }

    /// `true` if the vehicle is exactly at `node`.
    #[inline]
    pub fn is_at(self, node: NodeId) -> bool {
        self.node() == Some(node)
    }
}
