//! Courier role: end-to-end service, nearest job first.
//!
//! With parcels on board and parcels waiting, the courier weighs the
//! nearest carried delivery against the nearest servable pickup and keeps
//! delivering when the pickup is claimed, does not fit, or takes longer to
//! service than the delivery.

use cs_core::{Container, TimeLapse};

use crate::agent::VehicleAgent;
use crate::env::{PdpModel, RoadModel};
use crate::event::DispatchEvent;
use crate::state::VehicleState;

impl VehicleAgent {
    pub(crate) fn courier_step<E>(
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
            } else if self.contention.is_claimed(me, &parcel, &*env) {
                self.abandon_contended(state, parcel.id, env, events);
            } else {
                self.approach_pickup(state, parcel, lapse, env, events);
            }
            return;
        }

        let container = Container::Vehicle(me);
        let free  = env.free_capacity(container);
        let rated = env.container_capacity(container);
        let carried = self.nearest_carried(me, &*env);
        let waiting = env
            .available_parcels_nearest_first(me)
            .into_iter()
            .find(|p| p.needed_capacity <= rated);

        match (waiting, carried) {
            (None, None) => {}
            (None, Some(c)) => self.commit_with_debit(state, c, &*env, events),
            (Some(_), None) => {
                if let Some(p) = self.contention.nearest_unclaimed(me, free, rated, &*env) {
                    self.commit_with_credit(state, p, &*env, events);
                }
            }
            (Some(p), Some(c)) => {
                let keep_delivering = self.contention.is_claimed(me, &p, &*env)
                    || p.needed_capacity > free
                    || p.pickup_duration_ms > c.delivery_duration_ms;
                if keep_delivering {
                    self.commit_with_debit(state, c, &*env, events);
                } else {
                    self.commit_with_credit(state, p, &*env, events);
                }
            }
        }
    }
}
