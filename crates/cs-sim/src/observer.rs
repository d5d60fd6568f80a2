//! Simulation observer trait, per-step summaries and vehicle snapshots.

use cs_core::{GeoPoint, NodeId, ParcelId, Step, VehicleId};
use cs_dispatch::{DispatchEvent, Phase, Role};
use cs_world::ParcelCounts;

// ── EventTally ────────────────────────────────────────────────────────────────

/// Dispatch events of one step, counted by kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventTally {
    pub commitments: usize,
    pub pickups:     usize,
    pub deliveries:  usize,
    pub drops:       usize,
    pub loads:       usize,
    pub contentions: usize,
    pub stale:       usize,
    pub refusals:    usize,
    pub spawned:     usize,
}

impl EventTally {
    pub fn record(&mut self, events: &[DispatchEvent]) {
        for e in events {
            match e {
                DispatchEvent::Committed { .. }  => self.commitments += 1,
                DispatchEvent::PickedUp(_)       => self.pickups += 1,
                DispatchEvent::Delivered(_)      => self.deliveries += 1,
                DispatchEvent::Dropped { .. }    => self.drops += 1,
                DispatchEvent::Loaded { .. }     => self.loads += 1,
                DispatchEvent::Contended { .. }  => self.contentions += 1,
                DispatchEvent::Stale(_)          => self.stale += 1,
                DispatchEvent::Refused { .. }    => self.refusals += 1,
                DispatchEvent::Moved { .. }
                | DispatchEvent::ReturnFlagged { .. }
                | DispatchEvent::DepotTripCharged { .. } => {}
            }
        }
    }
}

// ── StepSummary ───────────────────────────────────────────────────────────────

/// Fleet-wide state at the end of one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepSummary {
    pub step:         Step,
    /// Simulated ms at the end of the step.
    pub elapsed_ms:   u64,
    /// Σ profit over all vehicles.
    pub total_profit: f64,
    pub parcels:      ParcelCounts,
    pub events:       EventTally,
}

// ── VehicleSnapshot ───────────────────────────────────────────────────────────

/// One vehicle's state at a snapshot step.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleSnapshot {
    pub vehicle:    VehicleId,
    pub role:       Role,
    pub phase:      Phase,
    /// `None` while mid-edge.
    pub node:       Option<NodeId>,
    pub geo:        GeoPoint,
    pub cargo_load: u32,
    pub capacity:   u32,
    pub committed:  Option<ParcelId>,
    pub profit:     f64,
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — profit printer
///
/// ```rust,ignore
/// struct ProfitPrinter { last: f64 }
///
/// impl SimObserver for ProfitPrinter {
///     fn on_step_end(&mut self, summary: &StepSummary) {
///         if summary.total_profit != self.last {
///             println!("{}: {:.2}", summary.step, summary.total_profit);
///             self.last = summary.total_profit;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any vehicle decides.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after every vehicle decided and the spawner ran.
    fn on_step_end(&mut self, _summary: &StepSummary) {}

    /// Called every `config.output_interval_steps` steps.
    fn on_snapshot(&mut self, _step: Step, _vehicles: &[VehicleSnapshot]) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_step: Step, _total_profit: f64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
