//! Per-vehicle decision state.

use cs_core::{DepotId, NodeId, Parcel, ParcelId, VehicleId};

use crate::{DispatchError, DispatchResult, Role};

// ── Commitment ────────────────────────────────────────────────────────────────

/// The parcel a vehicle is currently heading for, together with the amount
/// that was booked to its profit when it committed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Commitment {
    pub parcel:   Parcel,
    /// Positive for an expected-profit credit, negative for a debited leg.
    pub credited: f64,
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Coarse state-machine view, derived from [`VehicleState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Seeking,
    Committed(ParcelId),
    ReturningToDepot,
    Loading(DepotId),
}

// ── VehicleState ──────────────────────────────────────────────────────────────

/// Everything a vehicle remembers between decisions.
///
/// Position and cargo live in the world; this struct carries only what the
/// dispatch logic owns.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub id:              VehicleId,
    role:                Role,
    pub capacity:        u32,
    pub commitment:      Option<Commitment>,
    /// Set when the vehicle must unload before taking new work.
    pub return_to_depot: bool,
    /// Depot a delivery vehicle is driving to for loading.
    pub loading_from:    Option<DepotId>,
    /// Running profit; may go negative.
    pub profit:          f64,
}

impl VehicleState {
    pub fn new(id: VehicleId, role: Role, capacity: u32) -> Self {
        Self {
            id,
            role,
            capacity,
            commitment: None,
            return_to_depot: false,
            loading_from: None,
            profit: 0.0,
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn committed_parcel(&self) -> Option<ParcelId> {
        self.commitment.map(|c| c.parcel.id)
    }

    pub fn phase(&self) -> Phase {
        if self.return_to_depot {
            Phase::ReturningToDepot
        } else if let Some(c) = self.commitment {
            Phase::Committed(c.parcel.id)
        } else if let Some(d) = self.loading_from {
            Phase::Loading(d)
        } else {
            Phase::Seeking
        }
    }

    /// Book `credit` and remember the commitment.
    pub(crate) fn commit(&mut self, parcel: Parcel, credit: f64) {
        self.profit += credit;
        self.commitment = Some(Commitment { parcel, credited: credit });
    }

    /// Drop the commitment and undo its booking.  Returns the amount undone.
    pub(crate) fn revoke(&mut self) -> f64 {
        match self.commitment.take() {
            Some(c) => {
                self.profit -= c.credited;
                c.credited
            }
            None => 0.0,
        }
    }
}

// ── VehicleSpec ───────────────────────────────────────────────────────────────

/// Construction parameters for one vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSpec {
    pub role:      Role,
    pub capacity:  u32,
    pub speed_kmh: f64,
    pub start:     NodeId,
}

impl VehicleSpec {
    pub fn new(role: Role, capacity: u32, speed_kmh: f64, start: NodeId) -> Self {
        Self { role, capacity, speed_kmh, start }
    }

    /// Reject specs the movement model cannot honour.
    pub fn validate(&self) -> DispatchResult<()> {
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(DispatchError::InvalidSpeed(self.speed_kmh));
        }
        if self.capacity == 0 {
            return Err(DispatchError::ZeroCapacity);
        }
        Ok(())
    }

    #[inline]
    pub fn speed_mps(&self) -> f64 {
        self.speed_kmh / 3.6
    }
}
