//! Unit tests for cs-world.

use cs_core::{
    Container, EdgeId, GeoPoint, NodeId, ParcelState, PdpError, Position, TimeLapse, VehicleId,
};
use cs_dispatch::{DispatchError, PdpModel, RoadModel, Role, VehicleSpec};
use cs_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::{ParcelCounts, World, WorldError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Straight two-way road `0 — 1 — 2 — 3`, 100 m per segment, plus an
/// isolated node 4.
fn line() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let n: Vec<NodeId> = (0..5)
        .map(|i| b.add_node(GeoPoint::new(0.0, i as f64 * 0.001)))
        .collect();
    for w in n[..4].windows(2) {
        b.add_road(w[0], w[1], 100.0);
    }
    b.build()
}

/// 1 m/s keeps the arithmetic exact.
fn spec(role: Role, capacity: u32, start: u32) -> VehicleSpec {
    VehicleSpec::new(role, capacity, 3.6, NodeId(start))
}

fn secs(s: u64) -> TimeLapse {
    TimeLapse::new(0, s * 1_000)
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod road_tests {
    use super::*;

    #[test]
    fn partial_move_stops_mid_edge_and_declares_destination() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();

        let mut lapse = secs(150);
        let moved = w.move_toward(v, NodeId(2), &mut lapse);
        assert_eq!(moved, 150.0);
        assert!(!lapse.has_time_left());
        assert_eq!(w.position(v), Position::OnEdge { edge: EdgeId(2), offset_m: 50.0 });
        assert_eq!(w.vehicle_destinations(), vec![(v, NodeId(2))]);
        assert_eq!(w.distance_to(v, NodeId(2)), Some(50.0));
        // Mid-edge vehicles carry on to the edge's end before turning.
        assert_eq!(w.distance_to(v, NodeId(0)), Some(250.0));

        let mut lapse = secs(100);
        let moved = w.move_toward(v, NodeId(2), &mut lapse);
        assert_eq!(moved, 50.0);
        assert_eq!(lapse.consumed_ms(), 50_000);
        assert_eq!(w.position(v), Position::Node(NodeId(2)));
        assert!(w.vehicle_destinations().is_empty());
    }

    #[test]
    fn spent_lapse_does_not_move() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        let mut lapse = secs(10);
        lapse.consume_all();
        assert_eq!(w.move_toward(v, NodeId(3), &mut lapse), 0.0);
        assert_eq!(w.position(v), Position::Node(NodeId(0)));
    }

    #[test]
    fn unreachable_target_is_not_declared() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        assert_eq!(w.distance_to(v, NodeId(4)), None);
        assert_eq!(w.move_toward(v, NodeId(4), &mut secs(10)), 0.0);
        assert!(w.vehicle_destinations().is_empty());
    }

    #[test]
    fn clear_destination_withdraws_claim() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        w.move_toward(v, NodeId(3), &mut secs(10));
        assert_eq!(w.vehicle_destinations().len(), 1);
        w.clear_destination(v);
        assert!(w.vehicle_destinations().is_empty());
    }

    #[test]
    fn parcels_ranked_by_network_distance_then_id() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 1)).unwrap();
        let far    = w.add_parcel(NodeId(3), NodeId(0), 1, 0, 0).unwrap();
        let left   = w.add_parcel(NodeId(0), NodeId(3), 1, 0, 0).unwrap();
        let right  = w.add_parcel(NodeId(2), NodeId(3), 1, 0, 0).unwrap();
        let _lost  = w.add_parcel(NodeId(4), NodeId(3), 1, 0, 0).unwrap();

        let ids: Vec<_> = w.available_parcels_nearest_first(v).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![left.id, right.id, far.id]);
        assert_eq!(w.nearest_available_parcel(v).map(|p| p.id), Some(left.id));
    }

    #[test]
    fn depots_ranked_by_distance() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Pickup, 5, 3)).unwrap();
        let a = w.add_depot(NodeId(0), 10).unwrap();
        let b = w.add_depot(NodeId(2), 10).unwrap();
        assert_eq!(w.depots_nearest_first(v), vec![b, a]);
    }

    #[test]
    fn vehicle_geo_interpolates() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        w.move_toward(v, NodeId(1), &mut secs(50));
        let p = w.vehicle_geo(v).unwrap();
        assert!((p.lon - 0.0005).abs() < 1e-12);
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn setup_validation() {
        let mut w = World::new(line());
        let bad_speed = VehicleSpec { speed_kmh: 0.0, ..spec(Role::Pickup, 5, 0) };
        assert!(matches!(
            w.add_vehicle(&bad_speed),
            Err(WorldError::InvalidVehicle(DispatchError::InvalidSpeed(_)))
        ));
        assert!(matches!(
            w.add_vehicle(&spec(Role::Pickup, 5, 99)),
            Err(WorldError::UnknownNode(NodeId(99)))
        ));
        assert!(matches!(w.add_depot(NodeId(1), 0), Err(WorldError::ZeroDepotCapacity)));
        w.add_depot(NodeId(1), 5).unwrap();
        assert!(matches!(w.add_depot(NodeId(1), 5), Err(WorldError::DuplicateDepot(_))));
        assert!(w.add_parcel(NodeId(0), NodeId(42), 1, 0, 0).is_err());
    }

    #[test]
    fn pickup_checks_location_capacity_and_state() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 2, 0)).unwrap();
        let u = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        let away = w.add_parcel(NodeId(1), NodeId(3), 1, 0, 0).unwrap();
        let big  = w.add_parcel(NodeId(0), NodeId(3), 3, 0, 0).unwrap();
        let ok   = w.add_parcel(NodeId(0), NodeId(3), 2, 0, 0).unwrap();
        let mut lapse = secs(10);

        assert_eq!(
            w.pickup(v, away.id, &mut lapse),
            Err(PdpError::NotAtLocation { vehicle: v, node: NodeId(1) })
        );
        assert!(matches!(
            w.pickup(v, big.id, &mut lapse),
            Err(PdpError::InsufficientCapacity { needed: 3, free: 2, .. })
        ));
        assert_eq!(w.parcel_state(big.id), Some(ParcelState::Available));

        w.pickup(v, ok.id, &mut lapse).unwrap();
        assert!(w.contains(v, ok.id));
        assert_eq!(w.contents_size(Container::Vehicle(v)), 2);
        assert_eq!(w.free_capacity(Container::Vehicle(v)), 0);
        assert!(matches!(w.pickup(u, ok.id, &mut lapse), Err(PdpError::WrongState { .. })));
        assert!(!w.is_on_network(ok.id));
        assert_eq!(w.pickup(VehicleId(9), big.id, &mut lapse), Err(PdpError::UnknownVehicle(VehicleId(9))));
    }

    #[test]
    fn deliver_only_at_destination() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        let p = w.add_parcel(NodeId(0), NodeId(1), 1, 0, 0).unwrap();
        let mut lapse = secs(1_000);
        w.pickup(v, p.id, &mut lapse).unwrap();
        assert!(matches!(w.deliver(v, p.id, &mut lapse), Err(PdpError::NotAtLocation { .. })));
        w.move_toward(v, NodeId(1), &mut lapse);
        w.deliver(v, p.id, &mut lapse).unwrap();
        assert!(w.contents(Container::Vehicle(v)).is_empty());
    }

    #[test]
    fn delivered_parcel_leaves_the_registry() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        let p = w.add_parcel(NodeId(0), NodeId(1), 1, 0, 0).unwrap();
        let q = w.add_parcel(NodeId(2), NodeId(3), 1, 0, 0).unwrap();
        let mut lapse = secs(1_000);
        w.pickup(v, p.id, &mut lapse).unwrap();
        w.move_toward(v, NodeId(1), &mut lapse);
        w.deliver(v, p.id, &mut lapse).unwrap();

        assert_eq!(w.registry().parcel(p.id), None);
        assert_eq!(w.parcel_state(p.id), None);
        assert!(!w.is_on_network(p.id));
        assert!(!w.contains(v, p.id));
        assert_eq!(w.deliver(v, p.id, &mut lapse), Err(PdpError::UnknownParcel(p.id)));
        assert_eq!(w.registry().available(), vec![q]);

        let counts = w.parcel_counts();
        assert_eq!((counts.available, counts.delivered, counts.total()), (1, 1, 2));
    }

    #[test]
    fn depot_drop_and_load() {
        let mut w = World::new(line());
        let depot = w.add_depot(NodeId(0), 2).unwrap();
        let picker  = w.add_vehicle(&spec(Role::Pickup, 5, 0)).unwrap();
        let carrier = w.add_vehicle(&spec(Role::Delivery, 5, 3)).unwrap();
        let a = w.add_parcel(NodeId(0), NodeId(3), 2, 0, 0).unwrap();
        let b = w.add_parcel(NodeId(0), NodeId(3), 1, 0, 0).unwrap();
        let mut lapse = secs(1_000);
        w.pickup(picker, a.id, &mut lapse).unwrap();
        w.pickup(picker, b.id, &mut lapse).unwrap();

        w.drop_parcel(picker, a.id, &mut lapse).unwrap();
        assert_eq!(w.drop_parcel(picker, b.id, &mut lapse), Err(PdpError::DepotFull(depot.id)));
        assert_eq!(w.parcel_state(a.id), Some(ParcelState::AtDepot(depot.id)));
        assert_eq!(w.contents(Container::Depot(depot.id)), vec![a]);

        // Loading needs the carrier on the depot node.
        assert!(matches!(w.add_parcel_in(carrier, a.id), Err(PdpError::NotAtLocation { .. })));
        w.move_toward(carrier, NodeId(0), &mut lapse);
        w.add_parcel_in(carrier, a.id).unwrap();
        assert_eq!(w.parcel_state(a.id), Some(ParcelState::InCargo(carrier)));
        assert_eq!(w.contents_size(Container::Depot(depot.id)), 0);
        assert!(matches!(w.add_parcel_in(carrier, b.id), Err(PdpError::WrongState { .. })));
    }

    #[test]
    fn drop_away_from_depot_is_refused() {
        let mut w = World::new(line());
        w.add_depot(NodeId(3), 10).unwrap();
        let v = w.add_vehicle(&spec(Role::Pickup, 5, 0)).unwrap();
        let p = w.add_parcel(NodeId(0), NodeId(2), 1, 0, 0).unwrap();
        let mut lapse = secs(10);
        w.pickup(v, p.id, &mut lapse).unwrap();
        assert_eq!(w.drop_parcel(v, p.id, &mut lapse), Err(PdpError::NoDepotHere(v)));
        assert!(w.contains(v, p.id));
    }

    #[test]
    fn service_time_overflows_into_next_step() {
        let mut w = World::new(line());
        let v = w.add_vehicle(&spec(Role::Courier, 5, 0)).unwrap();
        let p = w.add_parcel(NodeId(0), NodeId(1), 1, 5_000, 0).unwrap();

        let mut lapse = TimeLapse::new(0, 2_000);
        w.pickup(v, p.id, &mut lapse).unwrap();
        assert!(!lapse.has_time_left());
        assert_eq!(w.registry().pending_service_ms(v), 3_000);

        let mut next = TimeLapse::new(2_000, 4_000);
        w.settle_service(v, &mut next);
        assert!(!next.has_time_left());
        assert_eq!(w.registry().pending_service_ms(v), 1_000);

        let mut last = TimeLapse::new(4_000, 6_000);
        w.settle_service(v, &mut last);
        assert_eq!(last.time_left_ms(), 1_000);
        assert_eq!(w.registry().pending_service_ms(v), 0);
    }

    #[test]
    fn counts_track_lifecycle() {
        let mut w = World::new(line());
        let depot = w.add_depot(NodeId(0), 10).unwrap();
        let v = w.add_vehicle(&spec(Role::Pickup, 5, 0)).unwrap();
        let a = w.add_parcel(NodeId(0), NodeId(3), 1, 0, 0).unwrap();
        let _b = w.add_parcel(NodeId(2), NodeId(3), 1, 0, 0).unwrap();
        let c = w.add_parcel(NodeId(0), NodeId(3), 1, 0, 0).unwrap();
        let mut lapse = secs(10);
        w.pickup(v, a.id, &mut lapse).unwrap();
        w.pickup(v, c.id, &mut lapse).unwrap();
        w.drop_parcel(v, c.id, &mut lapse).unwrap();

        let counts = w.parcel_counts();
        assert_eq!(counts, ParcelCounts { available: 1, in_cargo: 1, at_depot: 1, delivered: 0 });
        assert_eq!(counts.total(), 3);
        assert_eq!(w.depot(depot.id), Some(depot));
    }
}
