//! Optimistic claim detection.
//!
//! A vehicle claims a parcel implicitly by declaring its pickup node as
//! destination.  Any *other* vehicle whose declared destination equals that
//! node is taken to hold the claim.  Destinations are compared by node, so
//! two parcels waiting on the same node shadow each other; this is accepted.

use cs_core::{NodeId, Parcel, VehicleId};

use crate::env::{PdpModel, RoadModel};

#[derive(Copy, Clone, Debug, Default)]
pub struct ContentionResolver;

impl ContentionResolver {
    /// First other vehicle heading for `node`, if any.
    pub fn claimant(
        me:           VehicleId,
        node:         NodeId,
        destinations: &[(VehicleId, NodeId)],
    ) -> Option<VehicleId> {
        destinations
            .iter()
            .find(|&&(v, dest)| v != me && dest == node)
            .map(|&(v, _)| v)
    }

    /// `true` if some vehicle other than `me` is heading for the parcel's
    /// pickup node.
    pub fn is_claimed<R: RoadModel + ?Sized>(&self, me: VehicleId, parcel: &Parcel, road: &R) -> bool {
        Self::claimant(me, parcel.pickup, &road.vehicle_destinations()).is_some()
    }

    /// Nearest `Available` parcel that no other vehicle is heading for and
    /// that fits both the free and the rated capacity of `me`.
    pub fn nearest_unclaimed<E>(&self, me: VehicleId, free: u32, rated: u32, env: &E) -> Option<Parcel>
    where
        E: RoadModel + PdpModel + ?Sized,
    {
        let destinations = env.vehicle_destinations();
        env.available_parcels_nearest_first(me)
            .into_iter()
            .filter(|p| p.needed_capacity <= free && p.needed_capacity <= rated)
            .find(|p| Self::claimant(me, p.pickup, &destinations).is_none())
    }
}
