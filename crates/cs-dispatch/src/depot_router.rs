//! Depot decisions: when to head back, where to go, and the hand-off itself.

use cs_core::{Container, Depot, ParcelId, TimeLapse, VehicleId};
use tracing::debug;

use crate::env::{PdpModel, RoadModel};
use crate::event::DispatchEvent;
use crate::state::VehicleState;

#[derive(Copy, Clone, Debug, Default)]
pub struct DepotRouter;

impl DepotRouter {
    /// `true` once the cargo occupies the whole rated capacity.
    pub fn is_full<P: PdpModel + ?Sized>(vehicle: VehicleId, pdp: &P) -> bool {
        let c = Container::Vehicle(vehicle);
        pdp.contents_size(c) >= pdp.container_capacity(c)
    }

    /// A pickup vehicle must unload when it is full or was flagged.
    pub fn should_return<P: PdpModel + ?Sized>(&self, state: &VehicleState, pdp: &P) -> bool {
        state.return_to_depot || Self::is_full(state.id, pdp)
    }

    /// Nearest reachable depot by network distance.
    pub fn nearest_depot<R: RoadModel + ?Sized>(&self, vehicle: VehicleId, road: &R) -> Option<Depot> {
        road.depots_nearest_first(vehicle).into_iter().next()
    }

    /// Nearest reachable depot whose buffer holds at least one parcel.
    pub fn nearest_stocked_depot<E>(&self, vehicle: VehicleId, env: &E) -> Option<Depot>
    where
        E: RoadModel + PdpModel + ?Sized,
    {
        env.depots_nearest_first(vehicle)
            .into_iter()
            .find(|d| env.contents_size(Container::Depot(d.id)) > 0)
    }

    /// Drop every carried parcel into `depot`.  The vehicle must stand on
    /// the depot node.  Parcels the depot refuses stay on board.
    pub fn unload<E>(
        &self,
        vehicle: VehicleId,
        depot:   &Depot,
        lapse:   &mut TimeLapse,
        env:     &mut E,
        events:  &mut Vec<DispatchEvent>,
    ) -> usize
    where
        E: RoadModel + PdpModel + ?Sized,
    {
        let mut dropped = 0;
        for parcel in env.contents(Container::Vehicle(vehicle)) {
            match env.drop_parcel(vehicle, parcel.id, lapse) {
                Ok(()) => {
                    dropped += 1;
                    events.push(DispatchEvent::Dropped { parcel: parcel.id, depot: depot.id });
                }
                Err(error) => {
                    debug!(%vehicle, parcel = %parcel.id, %error, "drop refused");
                    events.push(DispatchEvent::Refused { parcel: parcel.id, error });
                }
            }
        }
        dropped
    }

    /// Single pass over the depot buffer in arrival order, loading every
    /// parcel that still fits.  Oversized parcels are skipped, not waited on.
    pub fn load_from_depot<E>(
        &self,
        vehicle: VehicleId,
        depot:   &Depot,
        env:     &mut E,
        events:  &mut Vec<DispatchEvent>,
    ) -> Vec<ParcelId>
    where
        E: RoadModel + PdpModel + ?Sized,
    {
        let mut loaded = Vec::new();
        for parcel in env.contents(Container::Depot(depot.id)) {
            let free = env.free_capacity(Container::Vehicle(vehicle));
            if parcel.needed_capacity > free {
                continue;
            }
            match env.add_parcel_in(vehicle, parcel.id) {
                Ok(()) => {
                    loaded.push(parcel.id);
                    events.push(DispatchEvent::Loaded { parcel: parcel.id, depot: depot.id });
                }
                Err(error) => {
                    debug!(%vehicle, parcel = %parcel.id, %error, "load refused");
                    events.push(DispatchEvent::Refused { parcel: parcel.id, error });
                }
            }
        }
        loaded
    }
}
