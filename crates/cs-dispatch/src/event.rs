//! What a vehicle did during one decision.
//!
//! `decide` returns the events in the order they happened.  The simulator
//! counts them; tests assert on them.

use cs_core::{DepotId, NodeId, ParcelId, PdpError};

#[derive(Clone, Debug, PartialEq)]
pub enum DispatchEvent {
    /// Took on a commitment.  `credit` was added to profit (negative for a
    /// debited delivery leg).
    Committed { parcel: ParcelId, credit: f64 },

    /// Travelled toward `target`.
    Moved { target: NodeId, distance_m: f64 },

    PickedUp(ParcelId),
    Delivered(ParcelId),
    Dropped { parcel: ParcelId, depot: DepotId },
    Loaded { parcel: ParcelId, depot: DepotId },

    /// Gave up a parcel another vehicle is heading for.  `reversed` was
    /// subtracted from profit.
    Contended { parcel: ParcelId, reversed: f64 },

    /// The committed parcel left the network through someone else.  The
    /// commitment was dropped; booked profit stands.
    Stale(ParcelId),

    /// The nearest parcel does not fit; head for a depot first.
    ReturnFlagged { parcel: ParcelId },

    /// Filled up on pickup; the trip to the depot was debited in advance.
    DepotTripCharged { depot: DepotId, cost: f64 },

    /// The registry refused a transition.  Nothing changed.
    Refused { parcel: ParcelId, error: PdpError },
}
