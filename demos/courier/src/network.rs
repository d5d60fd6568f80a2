//! Synthetic street grid.
//!
//! A rectangular grid of two-way streets laid over a small patch of
//! Mobile, Alabama.  Street lengths are great-circle distances between the
//! intersections.

use cs_core::{GeoPoint, NodeId};
use cs_spatial::{RoadNetwork, RoadNetworkBuilder};

/// South-west corner of the grid.
const ORIGIN: GeoPoint = GeoPoint { lat: 30.680, lon: -88.080 };

/// Degrees between neighbouring intersections (~220 m north-south).
const BLOCK_DEG: f64 = 0.002;

/// Build a `cols × rows` grid.  Node `r * cols + c` sits at column `c`,
/// row `r`.
pub fn build_grid(cols: u32, rows: u32) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::with_capacity((cols * rows) as usize, (4 * cols * rows) as usize);
    let mut ids = Vec::with_capacity((cols * rows) as usize);
    for r in 0..rows {
        for c in 0..cols {
            ids.push(b.add_node(intersection(c, r)));
        }
    }
    let at = |c: u32, r: u32| ids[(r * cols + c) as usize];
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                b.add_street(at(c, r), at(c + 1, r));
            }
            if r + 1 < rows {
                b.add_street(at(c, r), at(c, r + 1));
            }
        }
    }
    b.build()
}

pub fn intersection(col: u32, row: u32) -> GeoPoint {
    GeoPoint::new(
        ORIGIN.lat + row as f64 * BLOCK_DEG,
        ORIGIN.lon + col as f64 * BLOCK_DEG,
    )
}

/// Nearest intersection to a fractional grid coordinate.
pub fn snap(network: &RoadNetwork, col: f64, row: f64) -> Option<NodeId> {
    network.snap_to_node(GeoPoint::new(
        ORIGIN.lat + row * BLOCK_DEG,
        ORIGIN.lon + col * BLOCK_DEG,
    ))
}
