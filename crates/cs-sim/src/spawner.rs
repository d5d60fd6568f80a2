//! Random parcel arrivals.

use cs_core::{NodeId, Parcel, SimRng};
use cs_spatial::Router;
use cs_world::{World, WorldResult};

use crate::{SimError, SimResult};

/// How new parcels appear on the network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    /// Chance per step that one new parcel appears.
    pub new_parcel_probability: f64,
    /// Needed capacity is drawn uniformly from `1..=max_needed_capacity`.
    pub max_needed_capacity:    u32,
    /// Pickup and delivery service time of every spawned parcel.
    pub service_duration_ms:    u64,
    /// Parcels placed before the first step.
    pub initial_parcels:        usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            new_parcel_probability: 0.003,
            max_needed_capacity:    5,
            service_duration_ms:    5 * 60 * 1_000,
            initial_parcels:        3,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.new_parcel_probability) {
            return Err(SimError::Spawn(format!(
                "new_parcel_probability must be within [0, 1], got {}",
                self.new_parcel_probability
            )));
        }
        if self.max_needed_capacity == 0 {
            return Err(SimError::Spawn("max_needed_capacity must be positive".into()));
        }
        Ok(())
    }
}

/// Draws parcels with random endpoints from its own RNG stream.
pub struct ParcelSpawner {
    pub config: SpawnConfig,
    rng:        SimRng,
}

impl ParcelSpawner {
    pub fn new(config: SpawnConfig, rng: SimRng) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Spawn one parcel with probability `new_parcel_probability`.
    pub fn maybe_spawn<R: Router>(&mut self, world: &mut World<R>) -> WorldResult<Option<Parcel>> {
        if !self.rng.gen_bool(self.config.new_parcel_probability) {
            return Ok(None);
        }
        self.spawn(world)
    }

    /// Spawn one parcel unconditionally.  Pickup and delivery are distinct
    /// nodes whenever the network has more than one.  `None` on an empty
    /// network.
    pub fn spawn<R: Router>(&mut self, world: &mut World<R>) -> WorldResult<Option<Parcel>> {
        let n = world.network.node_count() as u32;
        if n == 0 {
            return Ok(None);
        }
        let pickup = NodeId(self.rng.gen_range(0..n));
        let delivery = if n > 1 {
            // Draw from the n-1 other nodes.
            let d = self.rng.gen_range(0..n - 1);
            NodeId(if d >= pickup.0 { d + 1 } else { d })
        } else {
            pickup
        };
        let needed = self.rng.gen_range(1..=self.config.max_needed_capacity);
        let service = self.config.service_duration_ms;
        world.add_parcel(pickup, delivery, needed, service, service).map(Some)
    }
}
