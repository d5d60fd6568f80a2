//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `vehicle_snapshots` and `step_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepSummaryRow, VehicleSnapshotRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS vehicle_snapshots (
                 vehicle_id       INTEGER NOT NULL,
                 step             INTEGER NOT NULL,
                 role             TEXT    NOT NULL,
                 phase            TEXT    NOT NULL,
                 node             INTEGER NOT NULL,
                 lat              REAL    NOT NULL,
                 lon              REAL    NOT NULL,
                 cargo_load       INTEGER NOT NULL,
                 capacity         INTEGER NOT NULL,
                 committed_parcel INTEGER NOT NULL,
                 profit           REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS step_summaries (
                 step         INTEGER PRIMARY KEY,
                 elapsed_ms   INTEGER NOT NULL,
                 total_profit REAL    NOT NULL,
                 available    INTEGER NOT NULL,
                 in_cargo     INTEGER NOT NULL,
                 at_depot     INTEGER NOT NULL,
                 delivered    INTEGER NOT NULL,
                 pickups      INTEGER NOT NULL,
                 deliveries   INTEGER NOT NULL,
                 contentions  INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO vehicle_snapshots \
                 (vehicle_id, step, role, phase, node, lat, lon, cargo_load, capacity, committed_parcel, profit) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.vehicle_id,
                    row.step as i64,
                    row.role,
                    row.phase,
                    row.node,
                    row.lat,
                    row.lon,
                    row.cargo_load,
                    row.capacity,
                    row.committed_parcel,
                    row.profit,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO step_summaries \
             (step, elapsed_ms, total_profit, available, in_cargo, at_depot, delivered, pickups, deliveries, contentions) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.step as i64,
                row.elapsed_ms as i64,
                row.total_profit,
                row.available as i64,
                row.in_cargo as i64,
                row.at_depot as i64,
                row.delivered as i64,
                row.pickups as i64,
                row.deliveries as i64,
                row.contentions as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
