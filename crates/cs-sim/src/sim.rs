//! The `Sim` struct and its step loop.

use cs_core::{Container, SimClock, SimConfig};
use cs_dispatch::{PdpModel, RoadModel, VehicleAgent, VehicleState};
use cs_spatial::{DijkstraRouter, Router};
use cs_world::World;
use tracing::{debug, info};

use crate::{EventTally, ParcelSpawner, SimObserver, SimResult, StepSummary, VehicleSnapshot};

/// The main simulation runner.
///
/// Holds the world, the fleet's decision state and the spawner, and drives
/// the sequential step loop described in the crate docs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router = DijkstraRouter> {
    /// Global configuration (total steps, seed, step duration, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current step and hands out lapses.
    pub clock: SimClock,

    /// Road network, vehicle tracks and parcel registry.
    pub world: World<R>,

    /// Per-vehicle decision state, indexed by `VehicleId`.
    pub vehicles: Vec<VehicleState>,

    /// Stateless decision logic shared by the whole fleet.
    pub agent: VehicleAgent,

    /// `None` when the run only uses parcels placed up front.
    pub spawner: Option<ParcelSpawner>,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current step to `config.end_step()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            vehicles = self.vehicles.len(),
            depots = self.world.depots().len(),
            steps = self.config.total_steps,
            "simulation started"
        );
        while self.clock.current_step < self.config.end_step() {
            self.step_observed(observer)?;
        }
        let total = self.total_profit();
        let counts = self.world.parcel_counts();
        info!(
            clock = %self.clock,
            total_profit = total,
            delivered = counts.delivered,
            waiting = counts.available,
            "simulation finished"
        );
        observer.on_sim_end(self.clock.current_step, total);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`).
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step_observed(observer)?;
        }
        Ok(())
    }

    /// Advance one step without an observer.
    pub fn step(&mut self) -> SimResult<StepSummary> {
        let summary = self.process_step()?;
        self.clock.advance();
        Ok(summary)
    }

    /// Σ profit over the fleet.
    pub fn total_profit(&self) -> f64 {
        self.vehicles.iter().map(|v| v.profit).sum()
    }

    /// Current state of every vehicle.
    pub fn snapshot(&self) -> Vec<VehicleSnapshot> {
        self.vehicles
            .iter()
            .map(|s| {
                let container = Container::Vehicle(s.id);
                VehicleSnapshot {
                    vehicle:    s.id,
                    role:       s.role(),
                    phase:      s.phase(),
                    node:       self.world.position(s.id).node(),
                    geo:        self.world.vehicle_geo(s.id).unwrap_or_default(),
                    cargo_load: self.world.contents_size(container),
                    capacity:   self.world.container_capacity(container),
                    committed:  s.committed_parcel(),
                    profit:     s.profit,
                }
            })
            .collect()
    }

    // ── Step processing ───────────────────────────────────────────────────

    fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_step;
        observer.on_step_start(now);
        let summary = self.process_step()?;
        observer.on_step_end(&summary);
        if self.config.output_interval_steps > 0
            && now.0.is_multiple_of(self.config.output_interval_steps)
        {
            observer.on_snapshot(now, &self.snapshot());
        }
        self.clock.advance();
        Ok(())
    }

    fn process_step(&mut self) -> SimResult<StepSummary> {
        let now = self.clock.current_step;
        let profit_before = self.total_profit();
        let mut events = EventTally::default();

        // ── Vehicles, ascending VehicleId ─────────────────────────────────
        for state in self.vehicles.iter_mut() {
            let mut lapse = self.clock.lapse();
            self.world.settle_service(state.id, &mut lapse);
            let emitted = self.agent.decide(state, &mut lapse, &mut self.world);
            events.record(&emitted);
        }

        // ── Arrivals ──────────────────────────────────────────────────────
        if let Some(spawner) = self.spawner.as_mut() {
            if let Some(parcel) = spawner.maybe_spawn(&mut self.world)? {
                debug!(step = %now, parcel = %parcel.id, pickup = %parcel.pickup, "new parcel");
                events.spawned += 1;
            }
        }

        let total_profit = self.total_profit();
        if total_profit != profit_before {
            debug!(step = %now, total_profit, "profit changed");
        }

        Ok(StepSummary {
            step: now,
            elapsed_ms: self.clock.elapsed_ms() + self.clock.step_duration_ms,
            total_profit,
            parcels: self.world.parcel_counts(),
            events,
        })
    }
}
