//! Fluent builder for constructing a [`Sim`].

use cs_core::{NodeId, SimConfig, SimRng};
use cs_dispatch::{CostConfig, CostModel, VehicleAgent, VehicleSpec, VehicleState};
use cs_spatial::{DijkstraRouter, RoadNetwork, Router};
use cs_world::World;
use tracing::info;

use crate::{ParcelSpawner, Sim, SimResult, SpawnConfig};

/// A parcel placed on the network before the first step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelSpec {
    pub pickup:               NodeId,
    pub delivery:             NodeId,
    pub needed_capacity:      u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pickup_duration_ms:   u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delivery_duration_ms: u64,
}

impl ParcelSpec {
    /// A parcel with instantaneous service.
    pub fn new(pickup: NodeId, delivery: NodeId, needed_capacity: u32) -> Self {
        Self { pickup, delivery, needed_capacity, pickup_duration_ms: 0, delivery_duration_ms: 0 }
    }
}

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total steps, seed, step duration, …
/// - [`RoadNetwork`] — the graph vehicles drive on
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                         |
/// |---------------------|---------------------------------|
/// | `.depot(n, cap)`    | No depots                       |
/// | `.vehicle(spec)`    | No vehicles                     |
/// | `.parcel(spec)`     | No parcels placed up front      |
/// | `.spawner(cfg)`     | No random arrivals              |
/// | `.cost(cfg)`        | `CostConfig::default()`         |
///
/// Vehicle ids follow the order of `.vehicle` calls; depot ids follow the
/// order of `.depot` calls.
pub struct SimBuilder<R: Router = DijkstraRouter> {
    config:   SimConfig,
    network:  RoadNetwork,
    router:   R,
    depots:   Vec<(NodeId, u32)>,
    vehicles: Vec<VehicleSpec>,
    parcels:  Vec<ParcelSpec>,
    spawner:  Option<SpawnConfig>,
    cost:     CostConfig,
}

impl SimBuilder<DijkstraRouter> {
    pub fn new(config: SimConfig, network: RoadNetwork) -> Self {
        Self::with_router(config, network, DijkstraRouter)
    }
}

impl<R: Router> SimBuilder<R> {
    pub fn with_router(config: SimConfig, network: RoadNetwork, router: R) -> Self {
        Self {
            config,
            network,
            router,
            depots:   Vec::new(),
            vehicles: Vec::new(),
            parcels:  Vec::new(),
            spawner:  None,
            cost:     CostConfig::default(),
        }
    }

    pub fn depot(mut self, node: NodeId, capacity: u32) -> Self {
        self.depots.push((node, capacity));
        self
    }

    pub fn vehicle(mut self, spec: VehicleSpec) -> Self {
        self.vehicles.push(spec);
        self
    }

    pub fn vehicles(mut self, specs: impl IntoIterator<Item = VehicleSpec>) -> Self {
        self.vehicles.extend(specs);
        self
    }

    pub fn parcel(mut self, spec: ParcelSpec) -> Self {
        self.parcels.push(spec);
        self
    }

    /// Random arrivals.  `initial_parcels` of them are placed before the
    /// first step, after any `.parcel` ones.
    pub fn spawner(mut self, config: SpawnConfig) -> Self {
        self.spawner = Some(config);
        self
    }

    pub fn cost(mut self, config: CostConfig) -> Self {
        self.cost = config;
        self
    }

    /// Validate every input and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;
        let agent = VehicleAgent::new(CostModel::new(self.cost)?);

        let mut world = World::with_router(self.network, self.router);
        for &(node, capacity) in &self.depots {
            world.add_depot(node, capacity)?;
        }

        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for spec in &self.vehicles {
            let id = world.add_vehicle(spec)?;
            vehicles.push(VehicleState::new(id, spec.role, spec.capacity));
        }

        for p in &self.parcels {
            world.add_parcel(
                p.pickup,
                p.delivery,
                p.needed_capacity,
                p.pickup_duration_ms,
                p.delivery_duration_ms,
            )?;
        }

        let mut root_rng = SimRng::new(self.config.seed);
        let spawner = match self.spawner {
            Some(cfg) => {
                let mut spawner = ParcelSpawner::new(cfg, root_rng.child(0))?;
                for _ in 0..spawner.config.initial_parcels {
                    spawner.spawn(&mut world)?;
                }
                Some(spawner)
            }
            None => None,
        };

        info!(
            vehicles = vehicles.len(),
            depots = world.depots().len(),
            parcels = world.parcel_counts().total(),
            seed = self.config.seed,
            "simulation built"
        );

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            world,
            vehicles,
            agent,
            spawner,
        })
    }
}
