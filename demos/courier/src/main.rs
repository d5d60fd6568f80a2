//! courier — a mixed delivery fleet on a synthetic street grid.
//!
//! Pickup vans sweep parcels into two depots, delivery vans carry them on,
//! and a few couriers do both ends themselves.  Pass a JSON file to override
//! any of the defaults below; set `RUST_LOG=debug` to watch the dispatch
//! decisions.
//!
//! ```text
//! cargo run -p courier -- demos/courier/config.json
//! ```

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cs_core::{NodeId, SimConfig, Step};
use cs_dispatch::{CostConfig, Role, VehicleSpec};
use cs_output::{CsvWriter, OutputWriter, SimOutputObserver};
use cs_sim::{SimBuilder, SimObserver, SpawnConfig, StepSummary, VehicleSnapshot};

use network::{build_grid, snap};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    grid_cols:  u32,
    grid_rows:  u32,
    output_dir: PathBuf,
    sim:        SimConfig,
    cost:       CostConfig,
    spawn:      SpawnConfig,
    fleet:      FleetConfig,
    /// Depot sites in fractional grid coordinates, snapped to the nearest
    /// intersection.
    depots:     Vec<DepotSite>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FleetConfig {
    pickup:    u32,
    delivery:  u32,
    courier:   u32,
    capacity:  u32,
    speed_kmh: f64,
}

#[derive(Debug, Deserialize)]
struct DepotSite {
    col:      f64,
    row:      f64,
    capacity: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid_cols:  12,
            grid_rows:  10,
            output_dir: PathBuf::from("output/courier"),
            sim: SimConfig {
                step_duration_ms:      1_000,
                total_steps:           8 * 3_600, // one working day
                seed:                  42,
                output_interval_steps: 300,
            },
            cost:   CostConfig::default(),
            spawn:  SpawnConfig { new_parcel_probability: 0.01, initial_parcels: 20, ..SpawnConfig::default() },
            fleet:  FleetConfig::default(),
            depots: vec![
                DepotSite { col: 2.5, row: 4.5, capacity: 200 },
                DepotSite { col: 8.5, row: 4.5, capacity: 200 },
            ],
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self { pickup: 4, delivery: 3, courier: 3, capacity: 10, speed_kmh: 30.0 }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else { return Ok(DemoConfig::default()) };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards to the output writer and prints the fleet profit whenever it
/// changes.
struct ProfitReporter<W: OutputWriter> {
    inner:       SimOutputObserver<W>,
    last_profit: f64,
    snapshots:   usize,
    summaries:   usize,
}

impl<W: OutputWriter> SimObserver for ProfitReporter<W> {
    fn on_step_end(&mut self, summary: &StepSummary) {
        self.summaries += 1;
        if summary.total_profit != self.last_profit {
            println!(
                "step {:>6}  profit {:>10.2}  delivered {:>4}  waiting {:>4}",
                summary.step.0, summary.total_profit, summary.parcels.delivered, summary.parcels.available
            );
            self.last_profit = summary.total_profit;
        }
        self.inner.on_step_end(summary);
    }

    fn on_snapshot(&mut self, step: Step, vehicles: &[VehicleSnapshot]) {
        self.snapshots += vehicles.len();
        self.inner.on_snapshot(step, vehicles);
    }

    fn on_sim_end(&mut self, final_step: Step, total_profit: f64) {
        self.inner.on_sim_end(final_step, total_profit);
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// Vehicles spread evenly over the grid, one role block after the other.
fn fleet(cfg: &FleetConfig, node_count: usize) -> Vec<VehicleSpec> {
    let roles = [
        (Role::Pickup, cfg.pickup),
        (Role::Delivery, cfg.delivery),
        (Role::Courier, cfg.courier),
    ];
    let total = (cfg.pickup + cfg.delivery + cfg.courier).max(1) as usize;
    roles
        .into_iter()
        .flat_map(|(role, n)| (0..n).map(move |_| role))
        .enumerate()
        .map(|(i, role)| {
            let start = NodeId((i * node_count / total) as u32);
            VehicleSpec::new(role, cfg.capacity, cfg.speed_kmh, start)
        })
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path.as_deref())?;
    info!(config = ?config_path, seed = cfg.sim.seed, "configuration loaded");

    let network = build_grid(cfg.grid_cols, cfg.grid_rows);
    if network.is_empty() {
        bail!("grid {}x{} has no intersections", cfg.grid_cols, cfg.grid_rows);
    }
    println!("=== courier — mixed delivery fleet ===");
    println!(
        "Street grid: {} intersections, {} directed streets",
        network.node_count(),
        network.edge_count()
    );

    let mut depots = Vec::with_capacity(cfg.depots.len());
    for site in &cfg.depots {
        let node = snap(&network, site.col, site.row)
            .with_context(|| format!("no intersection near depot site ({}, {})", site.col, site.row))?;
        depots.push((node, site.capacity));
    }
    let vehicles = fleet(&cfg.fleet, network.node_count());

    let mut builder = SimBuilder::new(cfg.sim.clone(), network)
        .cost(cfg.cost)
        .spawner(cfg.spawn.clone())
        .vehicles(vehicles);
    for (node, capacity) in depots {
        builder = builder.depot(node, capacity);
    }
    let mut sim = builder.build()?;
    println!(
        "Fleet: {} pickup, {} delivery, {} courier  |  depots: {}  |  steps: {}",
        cfg.fleet.pickup,
        cfg.fleet.delivery,
        cfg.fleet.courier,
        sim.world.depots().len(),
        cfg.sim.total_steps
    );
    println!();

    let writer = CsvWriter::new(&cfg.output_dir)?;
    let mut obs = ProfitReporter {
        inner:       SimOutputObserver::new(writer),
        last_profit: 0.0,
        snapshots:   0,
        summaries:   0,
    };

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    let counts = sim.world.parcel_counts();
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  vehicle_snapshots.csv : {} rows", obs.snapshots);
    println!("  step_summaries.csv    : {} rows", obs.summaries);
    println!(
        "  parcels: {} delivered, {} at depots, {} in cargo, {} waiting",
        counts.delivered, counts.at_depot, counts.in_cargo, counts.available
    );
    println!();

    println!("{:<8} {:<10} {:>6} {:>12}", "Vehicle", "Role", "Load", "Profit");
    println!("{}", "-".repeat(40));
    for s in sim.snapshot() {
        println!(
            "{:<8} {:<10} {:>3}/{:<2} {:>12.2}",
            s.vehicle.0, s.role.as_str(), s.cargo_load, s.capacity, s.profit
        );
    }
    println!("{}", "-".repeat(40));
    println!("{:<8} {:<10} {:>6} {:>12.2}", "Total", "", "", sim.total_profit());

    Ok(())
}
