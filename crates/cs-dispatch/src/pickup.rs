//! Pickup role: collect parcels from the network, unload at depots.

use cs_core::{Container, TimeLapse};
use tracing::debug;

use crate::agent::VehicleAgent;
use crate::env::{PdpModel, RoadModel};
use crate::event::DispatchEvent;
use crate::state::VehicleState;

impl VehicleAgent {
    pub(crate) fn pickup_step<E>(
        &self,
        state:  &mut VehicleState,
        lapse:  &mut TimeLapse,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let me = state.id;

        if self.depots.should_return(state, &*env) {
            state.return_to_depot = true;
            self.return_to_depot(state, lapse, env, events);
            return;
        }

        if let Some(parcel) = self.revalidate(state, env, events) {
            if self.contention.is_claimed(me, &parcel, &*env) {
                self.abandon_contended(state, parcel.id, env, events);
                return;
            }
            if self.approach_pickup(state, parcel, lapse, env, events) {
                self.charge_depot_trip_if_full(state, &*env, events);
            }
            return;
        }

        // Seeking: parcels larger than the rated capacity can never be
        // carried by this vehicle and are passed over.
        let container = Container::Vehicle(me);
        let free  = env.free_capacity(container);
        let rated = env.container_capacity(container);
        let nearest = env
            .available_parcels_nearest_first(me)
            .into_iter()
            .find(|p| p.needed_capacity <= rated);
        match nearest {
            None => {}
            Some(parcel) if parcel.needed_capacity <= free => {
                self.commit_with_credit(state, parcel, &*env, events);
            }
            Some(parcel) => {
                debug!(vehicle = %me, parcel = %parcel.id, free, "nearest parcel does not fit");
                state.return_to_depot = true;
                events.push(DispatchEvent::ReturnFlagged { parcel: parcel.id });
            }
        }
    }

    fn return_to_depot<E>(
        &self,
        state:  &mut VehicleState,
        lapse:  &mut TimeLapse,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let me = state.id;
        let Some(depot) = self.depots.nearest_depot(me, &*env) else {
            debug!(vehicle = %me, "no reachable depot");
            return;
        };
        if !self.drive_to(me, depot.node, lapse, env, events) {
            return;
        }
        let dropped = self.depots.unload(me, &depot, lapse, env, events);
        debug!(vehicle = %me, depot = %depot.id, dropped, "unloaded at depot");
        state.return_to_depot = false;
    }

    /// A pickup that fills the vehicle books the trip to the nearest depot
    /// straight away and turns the vehicle around.
    fn charge_depot_trip_if_full<E>(
        &self,
        state:  &mut VehicleState,
        env:    &E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        if !crate::DepotRouter::is_full(state.id, env) {
            return;
        }
        let Some(depot) = self.depots.nearest_depot(state.id, env) else { return };
        let cost = self.cost.leg_cost(env.distance_to(state.id, depot.node));
        state.profit -= cost;
        state.return_to_depot = true;
        debug!(vehicle = %state.id, depot = %depot.id, cost, "full; depot trip charged");
        events.push(DispatchEvent::DepotTripCharged { depot: depot.id, cost });
    }
}
