//! `cs-sim` — step loop orchestrator for the courier_sim fleet simulator.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:
//!   for vehicle in ascending VehicleId:
//!     ① lapse   — fresh budget of step_duration_ms
//!     ② settle  — pay service time still owed from earlier steps
//!     ③ decide  — VehicleAgent::decide(state, lapse, world)
//!   ④ spawn     — maybe put a new parcel on the network
//!   ⑤ observe   — on_step_end(summary); on_snapshot every N steps
//! ```
//!
//! Vehicles are processed strictly one after another.  A vehicle sees every
//! effect of the vehicles before it in the same step (destinations,
//! pickups), which is what makes contention detection work without locks.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_core::{NodeId, SimConfig};
//! use cs_dispatch::{Role, VehicleSpec};
//! use cs_sim::{NoopObserver, SimBuilder, SpawnConfig};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), network)
//!     .depot(NodeId(0), 100)
//!     .vehicle(VehicleSpec::new(Role::Pickup, 5, 30.0, NodeId(3)))
//!     .vehicle(VehicleSpec::new(Role::Delivery, 5, 30.0, NodeId(7)))
//!     .spawner(SpawnConfig::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("total profit {:.2}", sim.total_profit());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod spawner;


pub use builder::{ParcelSpec, SimBuilder};
pub use error::{SimError, SimResult};
pub use observer::{EventTally, NoopObserver, SimObserver, StepSummary, VehicleSnapshot};
pub use sim::Sim;
pub use spawner::{ParcelSpawner, SpawnConfig};
