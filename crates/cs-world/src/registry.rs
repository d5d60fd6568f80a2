//! Parcel registry: every parcel's lifecycle state, vehicle cargo, depot
//! buffers and outstanding service time.
//!
//! The registry is the only place a `ParcelState` changes.  Every mutation
//! checks the lifecycle, location and capacity first and leaves the registry
//! untouched when it refuses.  Delivered parcels are removed and only
//! counted.
//!
//! Location checks take the vehicle's current node as an argument; the
//! registry does not know about roads.

use cs_core::{
    Container, Depot, DepotId, NodeId, Parcel, ParcelId, ParcelState, PdpError, PdpResult,
    TimeLapse, VehicleId,
};

#[cfg(feature = "fx-hash")]
type ParcelMap = rustc_hash::FxHashMap<ParcelId, Entry>;
#[cfg(not(feature = "fx-hash"))]
type ParcelMap = std::collections::HashMap<ParcelId, Entry>;

#[derive(Copy, Clone, Debug)]
struct Entry {
    parcel: Parcel,
    state:  ParcelState,
}

/// Number of parcels in each lifecycle state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParcelCounts {
    pub available: usize,
    pub in_cargo:  usize,
    pub at_depot:  usize,
    pub delivered: usize,
}

impl ParcelCounts {
    pub fn total(&self) -> usize {
        self.available + self.in_cargo + self.at_depot + self.delivered
    }
}

#[derive(Default)]
pub struct ParcelRegistry {
    parcels:  ParcelMap,
    next_id:  u32,
    /// Per vehicle, in load order.
    cargo:    Vec<Vec<ParcelId>>,
    vehicle_capacity: Vec<u32>,
    /// Per depot, in arrival order.
    buffers:  Vec<Vec<ParcelId>>,
    depots:   Vec<Depot>,
    /// Service time still owed by each vehicle, in ms.
    pending_ms: Vec<u64>,
    delivered:  usize,
}

impl ParcelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Register a vehicle container.  Ids are assigned sequentially from 0.
    pub fn add_vehicle(&mut self, capacity: u32) -> VehicleId {
        let id = VehicleId(self.cargo.len() as u32);
        self.cargo.push(Vec::new());
        self.vehicle_capacity.push(capacity);
        self.pending_ms.push(0);
        id
    }

    pub fn add_depot(&mut self, node: NodeId, capacity: u32) -> Depot {
        let depot = Depot { id: DepotId(self.depots.len() as u32), node, capacity };
        self.depots.push(depot);
        self.buffers.push(Vec::new());
        depot
    }

    /// Place a new parcel on the network in state `Available`.
    pub fn add_parcel(
        &mut self,
        pickup:      NodeId,
        delivery:    NodeId,
        needed:      u32,
        pickup_ms:   u64,
        delivery_ms: u64,
    ) -> Parcel {
        let id = ParcelId(self.next_id);
        self.next_id += 1;
        let parcel = Parcel::new(id, pickup, delivery, needed).with_service(pickup_ms, delivery_ms);
        self.parcels.insert(id, Entry { parcel, state: ParcelState::Available });
        parcel
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn parcel(&self, id: ParcelId) -> Option<Parcel> {
        self.parcels.get(&id).map(|e| e.parcel)
    }

    pub fn state(&self, id: ParcelId) -> Option<ParcelState> {
        self.parcels.get(&id).map(|e| e.state)
    }

    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    pub fn depot_at(&self, node: NodeId) -> Option<Depot> {
        self.depots.iter().copied().find(|d| d.node == node)
    }

    pub fn vehicle_count(&self) -> usize {
        self.cargo.len()
    }

    /// All `Available` parcels in id order.
    pub fn available(&self) -> Vec<Parcel> {
        let mut out: Vec<Parcel> = self
            .parcels
            .values()
            .filter(|e| e.state == ParcelState::Available)
            .map(|e| e.parcel)
            .collect();
        out.sort_by_key(|p| p.id);
        out
    }

    pub fn counts(&self) -> ParcelCounts {
        let mut c = ParcelCounts { delivered: self.delivered, ..ParcelCounts::default() };
        for e in self.parcels.values() {
            match e.state {
                ParcelState::Available  => c.available += 1,
                ParcelState::InCargo(_) => c.in_cargo += 1,
                ParcelState::AtDepot(_) => c.at_depot += 1,
                // Never stored.
                ParcelState::Delivered  => {}
            }
        }
        c
    }

    fn ids(&self, container: Container) -> &[ParcelId] {
        let list = match container {
            Container::Vehicle(v) => self.cargo.get(v.index()),
            Container::Depot(d) => self.buffers.get(d.index()),
        };
        match list {
            Some(ids) => ids,
            None => &[],
        }
    }

    pub fn contents(&self, container: Container) -> Vec<Parcel> {
        self.ids(container).iter().filter_map(|&p| self.parcel(p)).collect()
    }

    pub fn capacity(&self, container: Container) -> u32 {
        match container {
            Container::Vehicle(v) => self.vehicle_capacity.get(v.index()).copied().unwrap_or(0),
            Container::Depot(d) => self.depots.get(d.index()).map_or(0, |d| d.capacity),
        }
    }

    pub fn size(&self, container: Container) -> u32 {
        self.contents(container).iter().map(|p| p.needed_capacity).sum()
    }

    pub fn free(&self, container: Container) -> u32 {
        self.capacity(container).saturating_sub(self.size(container))
    }

    pub fn contains(&self, vehicle: VehicleId, parcel: ParcelId) -> bool {
        self.state(parcel) == Some(ParcelState::InCargo(vehicle))
    }

    pub fn pending_service_ms(&self, vehicle: VehicleId) -> u64 {
        self.pending_ms.get(vehicle.index()).copied().unwrap_or(0)
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    pub fn pickup(
        &mut self,
        vehicle: VehicleId,
        parcel:  ParcelId,
        at:      Option<NodeId>,
        lapse:   &mut TimeLapse,
    ) -> PdpResult<()> {
        self.check_vehicle(vehicle)?;
        let entry = self.entry(parcel)?;
        expect_state(parcel, entry.state, "available", |s| s == ParcelState::Available)?;
        if at != Some(entry.parcel.pickup) {
            return Err(PdpError::NotAtLocation { vehicle, node: entry.parcel.pickup });
        }
        self.check_room(vehicle, &entry.parcel)?;

        self.set_state(parcel, ParcelState::InCargo(vehicle));
        self.cargo[vehicle.index()].push(parcel);
        self.spend_service(vehicle, entry.parcel.pickup_duration_ms, lapse);
        Ok(())
    }

    /// Hand a carried parcel over at its destination.  The parcel leaves the
    /// registry.
    pub fn deliver(
        &mut self,
        vehicle: VehicleId,
        parcel:  ParcelId,
        at:      Option<NodeId>,
        lapse:   &mut TimeLapse,
    ) -> PdpResult<()> {
        self.check_vehicle(vehicle)?;
        let entry = self.entry(parcel)?;
        expect_state(parcel, entry.state, "in cargo", |s| s == ParcelState::InCargo(vehicle))?;
        if at != Some(entry.parcel.delivery) {
            return Err(PdpError::NotAtLocation { vehicle, node: entry.parcel.delivery });
        }

        debug_assert!(entry.state.can_become(ParcelState::Delivered));
        self.cargo[vehicle.index()].retain(|&p| p != parcel);
        self.parcels.remove(&parcel);
        self.delivered += 1;
        self.spend_service(vehicle, entry.parcel.delivery_duration_ms, lapse);
        Ok(())
    }

    /// Move a carried parcel into the buffer of the depot on node `at`.
    pub fn drop_parcel(
        &mut self,
        vehicle: VehicleId,
        parcel:  ParcelId,
        at:      Option<NodeId>,
        _lapse:  &mut TimeLapse,
    ) -> PdpResult<()> {
        self.check_vehicle(vehicle)?;
        let entry = self.entry(parcel)?;
        expect_state(parcel, entry.state, "in cargo", |s| s == ParcelState::InCargo(vehicle))?;
        let depot = at
            .and_then(|n| self.depot_at(n))
            .ok_or(PdpError::NoDepotHere(vehicle))?;
        if self.free(Container::Depot(depot.id)) < entry.parcel.needed_capacity {
            return Err(PdpError::DepotFull(depot.id));
        }

        self.cargo[vehicle.index()].retain(|&p| p != parcel);
        self.buffers[depot.id.index()].push(parcel);
        self.set_state(parcel, ParcelState::AtDepot(depot.id));
        Ok(())
    }

    /// Move a parcel from its depot buffer into the cargo of a vehicle
    /// standing on that depot's node.
    pub fn load(&mut self, vehicle: VehicleId, parcel: ParcelId, at: Option<NodeId>) -> PdpResult<()> {
        self.check_vehicle(vehicle)?;
        let entry = self.entry(parcel)?;
        let ParcelState::AtDepot(depot) = entry.state else {
            return Err(PdpError::WrongState {
                parcel,
                expected: "at depot",
                actual:   entry.state.as_str(),
            });
        };
        let node = self.depots[depot.index()].node;
        if at != Some(node) {
            return Err(PdpError::NotAtLocation { vehicle, node });
        }
        self.check_room(vehicle, &entry.parcel)?;

        self.buffers[depot.index()].retain(|&p| p != parcel);
        self.cargo[vehicle.index()].push(parcel);
        self.set_state(parcel, ParcelState::InCargo(vehicle));
        Ok(())
    }

    /// Pay down service time owed from earlier steps out of `lapse`.
    pub fn settle_service(&mut self, vehicle: VehicleId, lapse: &mut TimeLapse) {
        if let Some(owed) = self.pending_ms.get_mut(vehicle.index()) {
            *owed = lapse.consume(*owed);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn entry(&self, parcel: ParcelId) -> PdpResult<Entry> {
        self.parcels.get(&parcel).copied().ok_or(PdpError::UnknownParcel(parcel))
    }

    fn check_vehicle(&self, vehicle: VehicleId) -> PdpResult<()> {
        if vehicle.index() < self.cargo.len() {
            Ok(())
        } else {
            Err(PdpError::UnknownVehicle(vehicle))
        }
    }

    fn check_room(&self, vehicle: VehicleId, parcel: &Parcel) -> PdpResult<()> {
        let free = self.free(Container::Vehicle(vehicle));
        if parcel.needed_capacity > free {
            return Err(PdpError::InsufficientCapacity {
                vehicle,
                parcel: parcel.id,
                needed: parcel.needed_capacity,
                free,
            });
        }
        Ok(())
    }

    fn set_state(&mut self, parcel: ParcelId, next: ParcelState) {
        if let Some(e) = self.parcels.get_mut(&parcel) {
            debug_assert!(e.state.can_become(next), "{} -> {}", e.state, next);
            e.state = next;
        }
    }

    /// Service that does not fit in this step is owed from the next ones.
    fn spend_service(&mut self, vehicle: VehicleId, ms: u64, lapse: &mut TimeLapse) {
        let overflow = lapse.consume(ms);
        self.pending_ms[vehicle.index()] += overflow;
    }
}

fn expect_state(
    parcel:   ParcelId,
    actual:   ParcelState,
    expected: &'static str,
    ok:       impl Fn(ParcelState) -> bool,
) -> PdpResult<()> {
    if ok(actual) {
        Ok(())
    } else {
        Err(PdpError::WrongState { parcel, expected, actual: actual.as_str() })
    }
}
