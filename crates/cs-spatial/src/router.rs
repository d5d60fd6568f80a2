//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The world calls routing through the [`Router`] trait, so applications can
//! swap in A* or a precomputed distance table without touching the dispatch
//! core.
//!
//! # Cost units
//!
//! Edge costs are lengths.  The priority queue orders integer millimetres
//! (`BinaryHeap` needs `Ord`); reported lengths are the exact `f64` sums of
//! `edge_length_m` along the chosen path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cs_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// A shortest path between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes in travel order, starting at the source and ending at the target.
    pub nodes: Vec<NodeId>,
    /// Edges to traverse in order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Total length in metres.
    pub length_m: f64,
}

impl Path {
    /// `true` if source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn length_km(&self) -> f64 {
        self.length_m / 1_000.0
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router: Send + Sync {
    /// Shortest path from `from` to `to`.  `from == to` yields a trivial
    /// path, not an error.
    fn path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Path>;

    /// Shortest-path length in metres from `from` to every node, indexed by
    /// `NodeId`.  Unreachable nodes hold `f64::INFINITY`.
    fn distances_from(&self, network: &RoadNetwork, from: NodeId) -> SpatialResult<Vec<f64>>;

    /// Shortest-path length in metres.
    fn distance(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<f64> {
        self.path(network, from, to).map(|p| p.length_m)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, minimising length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Path> {
        check_node(network, from)?;
        check_node(network, to)?;
        if from == to {
            return Ok(Path { nodes: vec![from], edges: vec![], length_m: 0.0 });
        }
        let search = dijkstra(network, from, Some(to));
        if search.prev_edge[to.index()] == EdgeId::INVALID {
            return Err(SpatialError::NoRoute { from, to });
        }
        Ok(reconstruct(network, &search, from, to))
    }

    fn distances_from(&self, network: &RoadNetwork, from: NodeId) -> SpatialResult<Vec<f64>> {
        check_node(network, from)?;
        Ok(dijkstra(network, from, None).dist_m)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

struct Search {
    dist_m:    Vec<f64>,
    prev_edge: Vec<EdgeId>,
}

fn check_node(network: &RoadNetwork, node: NodeId) -> SpatialResult<()> {
    if network.contains_node(node) {
        Ok(())
    } else {
        Err(SpatialError::NodeNotFound(node))
    }
}

#[inline]
fn edge_cost_mm(network: &RoadNetwork, edge: EdgeId) -> u64 {
    (network.edge_length_m[edge.index()] * 1_000.0).round() as u64
}

/// Single-source search; stops early once `target` is settled.
fn dijkstra(network: &RoadNetwork, from: NodeId, target: Option<NodeId>) -> Search {
    let n = network.node_count();
    let mut dist_mm   = vec![u64::MAX; n];
    let mut dist_m    = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist_mm[from.index()] = 0;
    dist_m[from.index()] = 0.0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if Some(node) == target {
            break;
        }
        // Skip stale heap entries.
        if cost > dist_mm[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(network, edge));

            if new_cost < dist_mm[neighbor.index()] {
                dist_mm[neighbor.index()] = new_cost;
                dist_m[neighbor.index()] = dist_m[node.index()] + network.edge_length_m[edge.index()];
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Search { dist_m, prev_edge }
}

fn reconstruct(network: &RoadNetwork, search: &Search, from: NodeId, to: NodeId) -> Path {
    let mut edges = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = search.prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    edges.reverse();
    nodes.reverse();
    Path { nodes, edges, length_m: search.dist_m[to.index()] }
}
