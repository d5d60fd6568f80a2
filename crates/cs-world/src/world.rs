//! `World<R>` — road network, vehicle tracks and parcel registry behind the
//! dispatch traits.

use cs_core::{
    Container, Depot, DepotId, GeoPoint, NodeId, Parcel, ParcelId, ParcelState, PdpResult,
    Position, TimeLapse, VehicleId,
};
use cs_dispatch::{PdpModel, RoadModel, VehicleSpec};
use cs_spatial::{DijkstraRouter, RoadNetwork, Router};
use tracing::warn;

use crate::{ParcelCounts, ParcelRegistry, RoadState, WorldError, WorldResult};

/// The simulated world.
///
/// # Type parameter
///
/// `R` is the shortest-path engine.  Defaults to [`DijkstraRouter`].
pub struct World<R: Router = DijkstraRouter> {
    pub network: RoadNetwork,
    pub router:  R,
    road:        RoadState,
    registry:    ParcelRegistry,
}

impl World<DijkstraRouter> {
    pub fn new(network: RoadNetwork) -> Self {
        Self::with_router(network, DijkstraRouter)
    }
}

impl<R: Router> World<R> {
    pub fn with_router(network: RoadNetwork, router: R) -> Self {
        Self { network, router, road: RoadState::new(), registry: ParcelRegistry::new() }
    }

    // ── Setup ─────────────────────────────────────────────────────────────────

    fn check_node(&self, node: NodeId) -> WorldResult<()> {
        if self.network.contains_node(node) {
            Ok(())
        } else {
            Err(WorldError::UnknownNode(node))
        }
    }

    /// Place a vehicle on its start node.
    pub fn add_vehicle(&mut self, spec: &VehicleSpec) -> WorldResult<VehicleId> {
        spec.validate()?;
        self.check_node(spec.start)?;
        let id = self.road.add_vehicle(spec.start, spec.speed_mps());
        let reg_id = self.registry.add_vehicle(spec.capacity);
        debug_assert_eq!(id, reg_id);
        Ok(id)
    }

    pub fn add_depot(&mut self, node: NodeId, capacity: u32) -> WorldResult<Depot> {
        self.check_node(node)?;
        if capacity == 0 {
            return Err(WorldError::ZeroDepotCapacity);
        }
        if self.registry.depot_at(node).is_some() {
            return Err(WorldError::DuplicateDepot(node));
        }
        Ok(self.registry.add_depot(node, capacity))
    }

    /// Put a new `Available` parcel on the network.
    pub fn add_parcel(
        &mut self,
        pickup:      NodeId,
        delivery:    NodeId,
        needed:      u32,
        pickup_ms:   u64,
        delivery_ms: u64,
    ) -> WorldResult<Parcel> {
        self.check_node(pickup)?;
        self.check_node(delivery)?;
        Ok(self.registry.add_parcel(pickup, delivery, needed, pickup_ms, delivery_ms))
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn registry(&self) -> &ParcelRegistry {
        &self.registry
    }

    pub fn road(&self) -> &RoadState {
        &self.road
    }

    pub fn vehicle_count(&self) -> usize {
        self.road.len()
    }

    pub fn depots(&self) -> &[Depot] {
        self.registry.depots()
    }

    pub fn depot(&self, id: DepotId) -> Option<Depot> {
        self.registry.depots().get(id.index()).copied()
    }

    pub fn parcel_state(&self, parcel: ParcelId) -> Option<ParcelState> {
        self.registry.state(parcel)
    }

    pub fn parcel_counts(&self) -> ParcelCounts {
        self.registry.counts()
    }

    /// Geographic coordinate of the vehicle, interpolated when mid-edge.
    pub fn vehicle_geo(&self, vehicle: VehicleId) -> Option<GeoPoint> {
        match self.road.track(vehicle)?.position {
            Position::Node(n) => self.network.node_pos.get(n.index()).copied(),
            Position::OnEdge { edge, offset_m } => Some(self.network.point_on_edge(edge, offset_m)),
        }
    }

    /// Pay down service time owed from earlier steps.
    pub fn settle_service(&mut self, vehicle: VehicleId, lapse: &mut TimeLapse) {
        self.registry.settle_service(vehicle, lapse);
    }

    // ── Movement internals ────────────────────────────────────────────────────

    /// The node routing starts from and the metres needed to reach it.
    fn entry_point(&self, vehicle: VehicleId) -> Option<(NodeId, f64)> {
        match self.road.track(vehicle)?.position {
            Position::Node(n) => Some((n, 0.0)),
            Position::OnEdge { edge, offset_m } => {
                let len = self.network.edge_length_m[edge.index()];
                Some((self.network.edge_to[edge.index()], (len - offset_m).max(0.0)))
            }
        }
    }

    /// Shortest-path lengths from the vehicle to every node.
    fn distances_from_vehicle(&self, vehicle: VehicleId) -> Option<Vec<f64>> {
        let (node, head) = self.entry_point(vehicle)?;
        match self.router.distances_from(&self.network, node) {
            Ok(mut dist) => {
                dist.iter_mut().for_each(|d| *d += head);
                Some(dist)
            }
            Err(error) => {
                warn!(%vehicle, %error, "distance query failed");
                None
            }
        }
    }

    fn vehicle_node(&self, vehicle: VehicleId) -> Option<NodeId> {
        self.road.track(vehicle).and_then(|t| t.position.node())
    }
}

/// Metres covered on a stretch of `len_m` at `speed_mps`.  Consumes the
/// time it takes, rounded up to whole milliseconds.
fn advance(len_m: f64, speed_mps: f64, lapse: &mut TimeLapse) -> f64 {
    let needed_ms = (len_m / speed_mps * 1_000.0).ceil() as u64;
    if needed_ms <= lapse.time_left_ms() {
        lapse.consume(needed_ms);
        return len_m;
    }
    let covered = speed_mps * lapse.time_left_ms() as f64 / 1_000.0;
    lapse.consume_all();
    covered.min(len_m)
}

// ── RoadModel ─────────────────────────────────────────────────────────────────

impl<R: Router> RoadModel for World<R> {
    fn position(&self, vehicle: VehicleId) -> Position {
        self.road
            .track(vehicle)
            .map_or(Position::Node(NodeId::INVALID), |t| t.position)
    }

    fn distance_to(&self, vehicle: VehicleId, target: NodeId) -> Option<f64> {
        let (node, head) = self.entry_point(vehicle)?;
        self.router
            .distance(&self.network, node, target)
            .ok()
            .map(|d| head + d)
    }

    fn move_toward(&mut self, vehicle: VehicleId, target: NodeId, lapse: &mut TimeLapse) -> f64 {
        let Some(track) = self.road.track(vehicle).copied() else { return 0.0 };
        let speed = track.speed_mps;
        let mut position = track.position;
        let mut travelled = 0.0;

        // Finish the current edge first.
        if let Position::OnEdge { edge, offset_m } = position {
            let remaining = (self.network.edge_length_m[edge.index()] - offset_m).max(0.0);
            let covered = advance(remaining, speed, lapse);
            travelled += covered;
            position = if covered < remaining {
                Position::OnEdge { edge, offset_m: offset_m + covered }
            } else {
                Position::Node(self.network.edge_to[edge.index()])
            };
        }

        let mut routable = true;
        if let Position::Node(node) = position {
            if node != target {
                match self.router.path(&self.network, node, target) {
                    Ok(path) => {
                        for edge in path.edges {
                            if !lapse.has_time_left() {
                                break;
                            }
                            let len = self.network.edge_length_m[edge.index()];
                            let covered = advance(len, speed, lapse);
                            travelled += covered;
                            if covered < len {
                                position = Position::OnEdge { edge, offset_m: covered };
                                break;
                            }
                            position = Position::Node(self.network.edge_to[edge.index()]);
                        }
                    }
                    Err(error) => {
                        warn!(%vehicle, %target, %error, "cannot route");
                        routable = false;
                    }
                }
            }
        }

        if let Some(t) = self.road.track_mut(vehicle) {
            t.position = position;
            t.destination = (routable && !position.is_at(target)).then_some(target);
        }
        travelled
    }

    fn clear_destination(&mut self, vehicle: VehicleId) {
        if let Some(t) = self.road.track_mut(vehicle) {
            t.destination = None;
        }
    }

    fn available_parcels_nearest_first(&self, vehicle: VehicleId) -> Vec<Parcel> {
        let Some(dist) = self.distances_from_vehicle(vehicle) else { return Vec::new() };
        let mut ranked: Vec<(f64, Parcel)> = self
            .registry
            .available()
            .into_iter()
            .filter_map(|p| {
                let d = dist.get(p.pickup.index()).copied()?;
                d.is_finite().then_some((d, p))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        ranked.into_iter().map(|(_, p)| p).collect()
    }

    fn is_on_network(&self, parcel: ParcelId) -> bool {
        self.registry.state(parcel) == Some(ParcelState::Available)
    }

    fn vehicle_destinations(&self) -> Vec<(VehicleId, NodeId)> {
        self.road.destinations()
    }

    fn depots_nearest_first(&self, vehicle: VehicleId) -> Vec<Depot> {
        let Some(dist) = self.distances_from_vehicle(vehicle) else { return Vec::new() };
        let mut ranked: Vec<(f64, Depot)> = self
            .registry
            .depots()
            .iter()
            .filter_map(|&d| {
                let m = dist.get(d.node.index()).copied()?;
                m.is_finite().then_some((m, d))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        ranked.into_iter().map(|(_, d)| d).collect()
    }
}

// ── PdpModel ──────────────────────────────────────────────────────────────────

impl<R: Router> PdpModel for World<R> {
    fn contents(&self, container: Container) -> Vec<Parcel> {
        self.registry.contents(container)
    }

    fn container_capacity(&self, container: Container) -> u32 {
        self.registry.capacity(container)
    }

    fn contents_size(&self, container: Container) -> u32 {
        self.registry.size(container)
    }

    fn contains(&self, vehicle: VehicleId, parcel: ParcelId) -> bool {
        self.registry.contains(vehicle, parcel)
    }

    fn pickup(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()> {
        let at = self.vehicle_node(vehicle);
        self.registry.pickup(vehicle, parcel, at, lapse)
    }

    fn deliver(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()> {
        let at = self.vehicle_node(vehicle);
        self.registry.deliver(vehicle, parcel, at, lapse)
    }

    fn drop_parcel(&mut self, vehicle: VehicleId, parcel: ParcelId, lapse: &mut TimeLapse) -> PdpResult<()> {
        let at = self.vehicle_node(vehicle);
        self.registry.drop_parcel(vehicle, parcel, at, lapse)
    }

    fn add_parcel_in(&mut self, vehicle: VehicleId, parcel: ParcelId) -> PdpResult<()> {
        let at = self.vehicle_node(vehicle);
        self.registry.load(vehicle, parcel, at)
    }
}
