//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use cs_core::Step;
use cs_sim::{SimObserver, StepSummary, VehicleSnapshot};
use tracing::warn;

use crate::row::{StepSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes vehicle snapshots and step summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, summary: &StepSummary) {
        let result = self.writer.write_step_summary(&StepSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, vehicles: &[VehicleSnapshot]) {
        if vehicles.is_empty() {
            return;
        }
        let rows: Vec<VehicleSnapshotRow> = vehicles
            .iter()
            .map(|v| VehicleSnapshotRow::from_snapshot(step.0, v))
            .collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_step: Step, _total_profit: f64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
