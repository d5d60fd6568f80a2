//! `cs-output` — simulation output writers for courier_sim.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend     | Files created                                      |
//! |-----------|-------------|----------------------------------------------------|
//! | *(none)*  | CSV         | `vehicle_snapshots.csv`, `step_summaries.csv`      |
//! | `sqlite`  | SQLite      | `output.db`                                        |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `cs_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{StepSummaryRow, VehicleSnapshotRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
