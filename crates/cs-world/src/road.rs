//! Per-vehicle road state.

use cs_core::{NodeId, Position, VehicleId};

/// Where a vehicle is, how fast it goes, and where it declared it is going.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    pub position:    Position,
    pub speed_mps:   f64,
    /// Set while travelling; cleared on arrival or withdrawal.  Other
    /// vehicles read it to detect claims.
    pub destination: Option<NodeId>,
}

/// Tracks of all vehicles, indexed by `VehicleId`.
#[derive(Clone, Debug, Default)]
pub struct RoadState {
    tracks: Vec<Track>,
}

impl RoadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a stationary vehicle on `node`.  Ids are sequential from 0.
    pub fn add_vehicle(&mut self, node: NodeId, speed_mps: f64) -> VehicleId {
        let id = VehicleId(self.tracks.len() as u32);
        self.tracks.push(Track { position: Position::Node(node), speed_mps, destination: None });
        id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, vehicle: VehicleId) -> Option<&Track> {
        self.tracks.get(vehicle.index())
    }

    pub fn track_mut(&mut self, vehicle: VehicleId) -> Option<&mut Track> {
        self.tracks.get_mut(vehicle.index())
    }

    /// `(vehicle, destination)` for every vehicle that declared one, in id
    /// order.
    pub fn destinations(&self) -> Vec<(VehicleId, NodeId)> {
        self.tracks
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.destination.map(|d| (VehicleId(i as u32), d)))
            .collect()
    }
}
