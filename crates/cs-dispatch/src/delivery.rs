//! Delivery role: load at depots, deliver carried parcels.

use cs_core::{Container, TimeLapse};
use tracing::debug;

use crate::agent::VehicleAgent;
use crate::env::{PdpModel, RoadModel};
use crate::event::DispatchEvent;
use crate::state::VehicleState;

impl VehicleAgent {
    pub(crate) fn delivery_step<E>(
        &self,
        state:  &mut VehicleState,
        lapse:  &mut TimeLapse,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let me = state.id;

        if let Some(parcel) = self.revalidate(state, env, events) {
            if env.contains(me, parcel.id) {
                self.approach_delivery(state, parcel, lapse, env, events);
                return;
            }
            // Only carried parcels are ever committed to by this role.
            self.drop_stale(state, parcel.id, env, events);
        }

        // Seeking with cargo: first carried parcel, in load order, whose
        // destination is reachable.
        let cargo = env.contents(Container::Vehicle(me));
        if !cargo.is_empty() {
            state.loading_from = None;
            let next = cargo
                .into_iter()
                .find(|p| env.distance_to(me, p.delivery).is_some());
            if let Some(parcel) = next {
                self.commit_with_debit(state, parcel, &*env, events);
            }
            return;
        }

        // Empty: go and load.
        let Some(depot) = self.depots.nearest_stocked_depot(me, &*env) else {
            state.loading_from = None;
            return;
        };
        state.loading_from = Some(depot.id);
        if !self.drive_to(me, depot.node, lapse, env, events) {
            return;
        }
        let loaded = self.depots.load_from_depot(me, &depot, env, events);
        debug!(vehicle = %me, depot = %depot.id, loaded = loaded.len(), "loaded from depot");
        state.loading_from = None;
    }
}
