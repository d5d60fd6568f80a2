//! Unit tests for cs-spatial.

use cs_core::{GeoPoint, NodeId};

use crate::{DijkstraRouter, RoadNetwork, RoadNetworkBuilder, Router, SpatialError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Diamond with a shortcut:
///
/// ```text
///        1
///  100 /   \ 100
///     0     3
///  50  \   / 300
///        2
/// ```
fn diamond() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
    let n1 = b.add_node(GeoPoint::new(0.001, 0.001));
    let n2 = b.add_node(GeoPoint::new(-0.001, 0.001));
    let n3 = b.add_node(GeoPoint::new(0.0, 0.002));
    b.add_road(n0, n1, 100.0);
    b.add_road(n1, n3, 100.0);
    b.add_road(n0, n2, 50.0);
    b.add_road(n2, n3, 300.0);
    b.build()
}

// ── Network ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod network_tests {
    use super::*;

    #[test]
    fn csr_layout() {
        let net = diamond();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 8);
        assert_eq!(net.out_degree(NodeId(0)), 2);
        assert_eq!(net.out_degree(NodeId(3)), 2);
        for e in net.out_edges(NodeId(1)) {
            assert_eq!(net.edge_from[e.index()], NodeId(1));
        }
    }

    #[test]
    fn edge_between_finds_directed_edge() {
        let net = diamond();
        let e = net.edge_between(NodeId(0), NodeId(2)).unwrap();
        assert_eq!(net.edge_length_m[e.index()], 50.0);
        assert!(net.edge_between(NodeId(1), NodeId(2)).is_none());
    }

    #[test]
    fn snap_to_nearest_node() {
        let net = diamond();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0009, 0.0011)), Some(NodeId(1)));
        assert_eq!(net.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 2)[0], NodeId(0));
        assert!(RoadNetwork::empty().snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn street_length_from_coordinates() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(50.0, 4.7));
        let c = b.add_node(GeoPoint::new(50.01, 4.7));
        b.add_street(a, c);
        let net = b.build();
        let len = net.edge_length_m[0];
        assert!((len - 1_112.0).abs() < 5.0, "got {len}");
    }

    #[test]
    fn point_on_edge_interpolates() {
        let net = diamond();
        let e = net.edge_between(NodeId(0), NodeId(1)).unwrap();
        let mid = net.point_on_edge(e, 50.0);
        assert!((mid.lat - 0.0005).abs() < 1e-9);
        assert!((mid.lon - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn bad_lengths_are_clamped() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_directed_edge(a, c, f64::NAN);
        b.add_directed_edge(c, a, -3.0);
        let net = b.build();
        assert!(net.edge_length_m.iter().all(|&l| l == 0.0));
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod router_tests {
    use super::*;

    #[test]
    fn shortest_path_prefers_upper_branch() {
        let net = diamond();
        let path = DijkstraRouter.path(&net, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(path.nodes, vec![NodeId(0), NodeId(1), NodeId(3)]);
        assert_eq!(path.edges.len(), 2);
        assert_eq!(path.length_m, 200.0);
        assert_eq!(path.length_km(), 0.2);
    }

    #[test]
    fn trivial_path() {
        let net = diamond();
        let path = DijkstraRouter.path(&net, NodeId(2), NodeId(2)).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.nodes, vec![NodeId(2)]);
        assert_eq!(path.length_m, 0.0);
    }

    #[test]
    fn distances_from_source() {
        let net = diamond();
        let d = DijkstraRouter.distances_from(&net, NodeId(2)).unwrap();
        assert_eq!(d, vec![50.0, 150.0, 0.0, 250.0]);
    }

    #[test]
    fn disconnected_is_no_route() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 1.0));
        let net = b.build();
        assert_eq!(
            DijkstraRouter.path(&net, a, c),
            Err(SpatialError::NoRoute { from: a, to: c })
        );
        let d = DijkstraRouter.distances_from(&net, a).unwrap();
        assert!(d[c.index()].is_infinite());
    }

    #[test]
    fn one_way_street_is_respected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 70.0);
        let net = b.build();
        assert_eq!(DijkstraRouter.distance(&net, a, c).unwrap(), 70.0);
        assert!(DijkstraRouter.distance(&net, c, a).is_err());
    }

    #[test]
    fn unknown_node_is_error() {
        let net = diamond();
        assert_eq!(
            DijkstraRouter.path(&net, NodeId(0), NodeId(99)),
            Err(SpatialError::NodeNotFound(NodeId(99)))
        );
    }
}
