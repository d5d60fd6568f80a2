//! `VehicleAgent` — one decision per vehicle per step.
//!
//! The agent itself is stateless; every vehicle's memory lives in its
//! [`VehicleState`].  One agent can therefore serve the whole fleet.
//!
//! The role-specific transitions live in `pickup`, `delivery` and `courier`.
//! This module holds the entry point and the moves they share: committing,
//! revalidating, backing off a contended parcel, and driving to a pickup or
//! delivery node.

use cs_core::{Container, NodeId, Parcel, ParcelId, TimeLapse, VehicleId};
use tracing::{debug, trace};

use crate::contention::ContentionResolver;
use crate::cost::CostModel;
use crate::depot_router::DepotRouter;
use crate::env::{PdpModel, RoadModel};
use crate::event::DispatchEvent;
use crate::role::Role;
use crate::state::VehicleState;

#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleAgent {
    pub(crate) cost:       CostModel,
    pub(crate) contention: ContentionResolver,
    pub(crate) depots:     DepotRouter,
}

impl VehicleAgent {
    pub fn new(cost: CostModel) -> Self {
        Self { cost, contention: ContentionResolver, depots: DepotRouter }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    /// Advance one vehicle by one step.
    ///
    /// Does nothing when `lapse` has no time left, so a second call with a
    /// spent budget is a no-op.
    pub fn decide<E>(&self, state: &mut VehicleState, lapse: &mut TimeLapse, env: &mut E) -> Vec<DispatchEvent>
    where
        E: RoadModel + PdpModel,
    {
        let mut events = Vec::new();
        if !lapse.has_time_left() {
            return events;
        }
        match state.role() {
            Role::Pickup   => self.pickup_step(state, lapse, env, &mut events),
            Role::Delivery => self.delivery_step(state, lapse, env, &mut events),
            Role::Courier  => self.courier_step(state, lapse, env, &mut events),
        }
        trace!(vehicle = %state.id, phase = ?state.phase(), profit = state.profit, "decided");
        events
    }

    // ── Shared moves ──────────────────────────────────────────────────────────

    /// Metres to the node that matters for `parcel`: its delivery node when
    /// carried, otherwise its pickup node.
    pub(crate) fn relevant_leg_m<E>(&self, vehicle: VehicleId, parcel: &Parcel, env: &E) -> Option<f64>
    where
        E: RoadModel + PdpModel,
    {
        let target = if env.contains(vehicle, parcel.id) { parcel.delivery } else { parcel.pickup };
        env.distance_to(vehicle, target)
    }

    /// Commit to an uncarried parcel and credit its expected profit.
    pub(crate) fn commit_with_credit<E>(
        &self,
        state:  &mut VehicleState,
        parcel: Parcel,
        env:    &E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let leg = self.relevant_leg_m(state.id, &parcel, env);
        let credit = self.cost.parcel_profit(Some(&parcel), leg);
        state.commit(parcel, credit);
        debug!(vehicle = %state.id, parcel = %parcel.id, credit, "committed to pickup");
        events.push(DispatchEvent::Committed { parcel: parcel.id, credit });
    }

    /// Commit to a carried parcel and debit the cost of its delivery leg.
    pub(crate) fn commit_with_debit<E>(
        &self,
        state:  &mut VehicleState,
        parcel: Parcel,
        env:    &E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let cost = self.cost.leg_cost(env.distance_to(state.id, parcel.delivery));
        state.commit(parcel, -cost);
        debug!(vehicle = %state.id, parcel = %parcel.id, cost, "committed to delivery");
        events.push(DispatchEvent::Committed { parcel: parcel.id, credit: -cost });
    }

    /// The committed parcel if it is still on the network or on board.
    /// Otherwise the commitment is dropped and `None` is returned.
    pub(crate) fn revalidate<E>(
        &self,
        state:  &mut VehicleState,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) -> Option<Parcel>
    where
        E: RoadModel + PdpModel,
    {
        let parcel = state.commitment?.parcel;
        if env.contains(state.id, parcel.id) || env.is_on_network(parcel.id) {
            return Some(parcel);
        }
        self.drop_stale(state, parcel.id, env, events);
        None
    }

    /// Forget a commitment that can no longer be served.  The destination
    /// goes with it so no other vehicle keeps seeing a claim on that node.
    pub(crate) fn drop_stale<E>(
        &self,
        state:  &mut VehicleState,
        parcel: ParcelId,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        state.commitment = None;
        env.clear_destination(state.id);
        debug!(vehicle = %state.id, %parcel, "commitment went stale");
        events.push(DispatchEvent::Stale(parcel));
    }

    /// Back off a parcel another vehicle is heading for: undo the credit,
    /// withdraw the destination and commit to the nearest unclaimed parcel
    /// that fits.  No movement happens this step.
    pub(crate) fn abandon_contended<E>(
        &self,
        state:  &mut VehicleState,
        parcel: ParcelId,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        let me = state.id;
        let reversed = state.revoke();
        env.clear_destination(me);
        debug!(vehicle = %me, %parcel, reversed, "parcel already taken");
        events.push(DispatchEvent::Contended { parcel, reversed });

        let container = Container::Vehicle(me);
        let free  = env.free_capacity(container);
        let rated = env.container_capacity(container);
        if let Some(next) = self.contention.nearest_unclaimed(me, free, rated, &*env) {
            self.commit_with_credit(state, next, &*env, events);
        }
    }

    /// Drive toward `node` unless already there.  Returns `true` on arrival.
    pub(crate) fn drive_to<E>(
        &self,
        vehicle: VehicleId,
        node:    NodeId,
        lapse:   &mut TimeLapse,
        env:     &mut E,
        events:  &mut Vec<DispatchEvent>,
    ) -> bool
    where
        E: RoadModel + PdpModel,
    {
        if !env.position(vehicle).is_at(node) {
            let distance_m = env.move_toward(vehicle, node, lapse);
            events.push(DispatchEvent::Moved { target: node, distance_m });
        }
        env.position(vehicle).is_at(node)
    }

    /// Head for the parcel's pickup node and load it on arrival.  The
    /// commitment is released once the pickup was attempted.  Returns `true`
    /// if the parcel is now on board.
    pub(crate) fn approach_pickup<E>(
        &self,
        state:  &mut VehicleState,
        parcel: Parcel,
        lapse:  &mut TimeLapse,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) -> bool
    where
        E: RoadModel + PdpModel,
    {
        if !self.drive_to(state.id, parcel.pickup, lapse, env, events) {
            return false;
        }
        state.commitment = None;
        match env.pickup(state.id, parcel.id, lapse) {
            Ok(()) => {
                debug!(vehicle = %state.id, parcel = %parcel.id, "picked up");
                events.push(DispatchEvent::PickedUp(parcel.id));
                true
            }
            Err(error) => {
                debug!(vehicle = %state.id, parcel = %parcel.id, %error, "pickup refused");
                events.push(DispatchEvent::Refused { parcel: parcel.id, error });
                false
            }
        }
    }

    /// Head for a carried parcel's delivery node and hand it over on
    /// arrival.
    pub(crate) fn approach_delivery<E>(
        &self,
        state:  &mut VehicleState,
        parcel: Parcel,
        lapse:  &mut TimeLapse,
        env:    &mut E,
        events: &mut Vec<DispatchEvent>,
    ) where
        E: RoadModel + PdpModel,
    {
        if !self.drive_to(state.id, parcel.delivery, lapse, env, events) {
            return;
        }
        state.commitment = None;
        match env.deliver(state.id, parcel.id, lapse) {
            Ok(()) => {
                debug!(vehicle = %state.id, parcel = %parcel.id, "delivered");
                events.push(DispatchEvent::Delivered(parcel.id));
            }
            Err(error) => {
                debug!(vehicle = %state.id, parcel = %parcel.id, %error, "delivery refused");
                events.push(DispatchEvent::Refused { parcel: parcel.id, error });
            }
        }
    }

    /// Carried parcel whose delivery node is nearest; unreachable ones are
    /// skipped.  Ties keep cargo order.
    pub(crate) fn nearest_carried<E>(&self, vehicle: VehicleId, env: &E) -> Option<Parcel>
    where
        E: RoadModel + PdpModel,
    {
        let mut best: Option<(f64, Parcel)> = None;
        for parcel in env.contents(Container::Vehicle(vehicle)) {
            let Some(d) = env.distance_to(vehicle, parcel.delivery) else { continue };
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, parcel));
            }
        }
        best.map(|(_, p)| p)
    }
}
