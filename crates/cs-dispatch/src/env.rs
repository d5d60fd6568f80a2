//! The collaborators a vehicle talks to while deciding.
//!
//! Both traits are implemented by the simulation world (`cs-world`).  The
//! dispatch core never sees how positions, paths or containers are stored.

use cs_core::{
    Container, Depot, NodeId, Parcel, ParcelId, PdpResult, Position, TimeLapse, VehicleId,
};

/// Road-network queries and movement.
pub trait RoadModel {
    /// Current position of `vehicle`.
    fn position(&self, vehicle: VehicleId) -> Position;

    /// Shortest-path length in metres from the vehicle's position to
    /// `target`.  `None` if the target cannot be reached.
    fn distance_to(&self, vehicle: VehicleId, target: NodeId) -> Option<f64>;

    /// Advance `vehicle` along the shortest path to `target`, spending time
    /// from `lapse` at the vehicle's speed.  Declares `target` as the
    /// vehicle's destination until it is reached.  Returns metres travelled.
    fn move_toward(&mut self, vehicle: VehicleId, target: NodeId, lapse: &mut TimeLapse) -> f64;

    /// Withdraw the vehicle's declared destination.
    fn clear_destination(&mut self, vehicle: VehicleId);

    /// Every `Available` parcel reachable from the vehicle, nearest pickup
    /// node first.  Ties break on `ParcelId`.
    fn available_parcels_nearest_first(&self, vehicle: VehicleId) -> Vec<Parcel>;

    /// Nearest `Available` parcel.
    fn nearest_available_parcel(&self, vehicle: VehicleId) -> Option<Parcel> {
        self.available_parcels_nearest_first(vehicle).into_iter().next()
    }

    /// `true` while the parcel waits on the network (state `Available`).
    fn is_on_network(&self, parcel: ParcelId) -> bool;

    /// Declared destinations of all vehicles currently heading somewhere.
    fn vehicle_destinations(&self) -> Vec<(VehicleId, NodeId)>;

    /// Every depot reachable from the vehicle, nearest first.
    fn depots_nearest_first(&self, vehicle: VehicleId) -> Vec<Depot>;
}

/// Pickup-and-delivery registry: containers and parcel transitions.
///
/// Every mutation returns `PdpResult`; a refusal leaves the registry
/// unchanged.
pub trait PdpModel {
    /// Parcels held by `container`, in the order they entered it.
    fn contents(&self, container: Container) -> Vec<Parcel>;

    /// Rated capacity of `container`.
    fn container_capacity(&self, container: Container) -> u32;

    /// Σ needed-capacity of the parcels held by `container`.
    fn contents_size(&self, container: Container) -> u32;

    /// `true` if `parcel` is in the cargo of `vehicle`.
    fn contains(&self, vehicle: VehicleId, parcel: ParcelId) -> bool;

    /// Load an `Available` parcel.  The vehicle must stand on its pickup
    /// node and have room for it.  Spends the pickup duration.
    fn pickup(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()>;

    /// Hand over a carried parcel at its delivery node.  Spends the delivery
    /// duration.
    fn deliver(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()>;

    /// Move a carried parcel into the buffer of the depot at the vehicle's
    /// node.
    fn drop_parcel(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()>;

    /// Move a parcel from a depot buffer into the vehicle's cargo.
    fn add_parcel_in(&mut self, vehicle: VehicleId, parcel: ParcelId) -> PdpResult<()>;

    /// Unused capacity of `container`.
    fn free_capacity(&self, container: Container) -> u32 {
        self.container_capacity(container)
            .saturating_sub(self.contents_size(container))
    }
}
