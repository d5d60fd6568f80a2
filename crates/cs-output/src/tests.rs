//! Integration tests for cs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{StepSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(vehicle_id: u32, step: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            vehicle_id,
            step,
            role:             "courier",
            phase:            "seeking",
            node:             vehicle_id * 10,
            lat:              0.0,
            lon:              0.001,
            cargo_load:       0,
            capacity:         5,
            committed_parcel: u32::MAX,
            profit:           0.0,
        }
    }

    fn summary_row(step: u64) -> StepSummaryRow {
        StepSummaryRow {
            step,
            elapsed_ms:   (step + 1) * 1_000,
            total_profit: 12.5,
            available:    3,
            in_cargo:     1,
            at_depot:     0,
            delivered:    2,
            pickups:      1,
            deliveries:   0,
            contentions:  0,
        }
    }

    fn read_all(path: &std::path::Path) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("vehicle_snapshots.csv").exists());
        assert!(dir.path().join("step_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_dir() {
        let dir = tmp();
        let nested = dir.path().join("run").join("out");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("step_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_all(&dir.path().join("vehicle_snapshots.csv"));
        assert_eq!(headers, VehicleSnapshotRow::HEADERS);
        assert!(rows.is_empty());

        let (headers, _) = read_all(&dir.path().join("step_summaries.csv"));
        assert_eq!(headers, StepSummaryRow::HEADERS);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_all(&dir.path().join("vehicle_snapshots.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0"); // vehicle_id
        assert_eq!(&rows[0][1], "5"); // step
        assert_eq!(&rows[0][2], "courier");
        assert_eq!(&rows[2][4], "20"); // node
        assert_eq!(&rows[1][9], u32::MAX.to_string());
        assert_eq!(&rows[1][10], "0.0000");
    }

    #[test]
    fn csv_step_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_all(&dir.path().join("step_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "4000");
        assert_eq!(&rows[0][2], "12.5000");
        assert_eq!(&rows[0][6], "2"); // delivered
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use cs_core::{GeoPoint, NodeId, SimConfig, Step};
    use cs_dispatch::{CostModel, Role, VehicleSpec};
    use cs_sim::{ParcelSpec, SimBuilder, SimObserver, StepSummary};
    use cs_spatial::RoadNetworkBuilder;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::error::{OutputError, OutputResult};
    use crate::observer::SimOutputObserver;
    use crate::row::{StepSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    /// Records rows in memory; fails every write after `fail_after` calls.
    #[derive(Default)]
    struct MemWriter {
        snapshots:  Vec<VehicleSnapshotRow>,
        summaries:  Vec<StepSummaryRow>,
        finished:   usize,
        fail_after: Option<usize>,
        calls:      usize,
    }

    impl MemWriter {
        fn count_call(&mut self) -> OutputResult<()> {
            self.calls += 1;
            match self.fail_after {
                Some(n) if self.calls > n => Err(OutputError::Io(std::io::Error::other(format!(
                    "write {} refused",
                    self.calls
                )))),
                _ => Ok(()),
            }
        }
    }

    impl OutputWriter for MemWriter {
        fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
            self.count_call()?;
            self.snapshots.extend_from_slice(rows);
            Ok(())
        }
        fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
            self.count_call()?;
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn courier_sim(total_steps: u64, interval: u64) -> cs_sim::Sim {
        let mut b = RoadNetworkBuilder::new();
        let nodes: Vec<NodeId> = (0..6).map(|i| b.add_node(GeoPoint::new(0.0, i as f64 * 0.001))).collect();
        for w in nodes.windows(2) {
            b.add_road(w[0], w[1], 100.0);
        }
        let config = SimConfig {
            step_duration_ms:      100_000,
            total_steps,
            seed:                  1,
            output_interval_steps: interval,
        };
        SimBuilder::new(config, b.build())
            .vehicle(VehicleSpec::new(Role::Courier, 5, 3.6, NodeId(0)))
            .vehicle(VehicleSpec::new(Role::Courier, 5, 3.6, NodeId(5)))
            .parcel(ParcelSpec::new(NodeId(1), NodeId(3), 2))
            .build()
            .unwrap()
    }

    #[test]
    fn rows_follow_the_sim() {
        let mut sim = courier_sim(6, 2);
        let mut obs = SimOutputObserver::new(MemWriter::default());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.summaries.len(), 6);
        assert_eq!(w.finished, 1);
        // Snapshots at steps 0, 2, 4 for two vehicles.
        assert_eq!(w.snapshots.len(), 6);
        assert_eq!(w.snapshots[0].vehicle_id, 0);
        assert_eq!(w.snapshots[0].role, "courier");
        assert_eq!(w.snapshots[0].phase, "committed");
        assert_eq!(w.snapshots[0].committed_parcel, 0);
        // Step 2: vehicle 0 carries the parcel; vehicle 1 lost it but keeps
        // the credit booked at step 0.
        assert_eq!(w.snapshots[2].cargo_load, 2);
        assert_eq!(w.snapshots[3].phase, "seeking");
        let booked = 130.0 - CostModel::default().moving_cost(0.4);
        assert!((w.snapshots[3].profit - booked).abs() < 1e-9, "{}", w.snapshots[3].profit);
        assert_eq!(w.snapshots[5].step, 4);

        let last = w.summaries[5];
        assert_eq!(last.delivered, 1);
        assert!((last.total_profit - sim.total_profit()).abs() < 1e-12);
    }

    #[test]
    fn first_error_is_kept() {
        let writer = MemWriter { fail_after: Some(1), ..MemWriter::default() };
        let mut obs = SimOutputObserver::new(writer);
        let summary = StepSummary {
            step:         Step(0),
            elapsed_ms:   100,
            total_profit: 0.0,
            parcels:      Default::default(),
            events:       Default::default(),
        };
        obs.on_step_end(&summary);
        obs.on_step_end(&summary);
        obs.on_step_end(&summary);

        let err = obs.take_error().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("I/O error: write 2 refused"));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_csv() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        let mut sim = courier_sim(10, 5);
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 4, "2 snapshot steps × 2 vehicles");
        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 10);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{StepSummaryRow, VehicleSnapshotRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap(vehicle_id: u32, node: u32, profit: f64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            vehicle_id,
            step:             1,
            role:             "pickup",
            phase:            "returning_to_depot",
            node,
            lat:              1.5,
            lon:              2.5,
            cargo_load:       3,
            capacity:         3,
            committed_parcel: u32::MAX,
            profit,
        }
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap(0, 10, 1.0), snap(1, 11, 2.0), snap(2, u32::MAX, -3.0)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM vehicle_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let (node, phase, profit): (i64, String, f64) = conn
            .query_row(
                "SELECT node, phase, profit FROM vehicle_snapshots WHERE vehicle_id = 2",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(node, u32::MAX as i64);
        assert_eq!(phase, "returning_to_depot");
        assert_eq!(profit, -3.0);
    }

    #[test]
    fn sqlite_step_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step:         7,
            elapsed_ms:   800_000,
            total_profit: 42.25,
            available:    1,
            in_cargo:     2,
            at_depot:     3,
            delivered:    4,
            pickups:      0,
            deliveries:   1,
            contentions:  0,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (elapsed, profit, at_depot): (i64, f64, i64) = conn
            .query_row(
                "SELECT elapsed_ms, total_profit, at_depot FROM step_summaries WHERE step = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(elapsed, 800_000);
        assert_eq!(profit, 42.25);
        assert_eq!(at_depot, 3);
    }
}
