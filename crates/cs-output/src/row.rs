//! Flat row types written by output backends.

use cs_core::{NodeId, ParcelId};
use cs_dispatch::Phase;
use cs_sim::{StepSummary, VehicleSnapshot};

/// One vehicle at one snapshot step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshotRow {
    pub vehicle_id:       u32,
    pub step:             u64,
    pub role:             &'static str,
    pub phase:            &'static str,
    /// `u32::MAX` while the vehicle is between nodes.
    pub node:             u32,
    pub lat:              f64,
    pub lon:              f64,
    pub cargo_load:       u32,
    pub capacity:         u32,
    /// `u32::MAX` when uncommitted.
    pub committed_parcel: u32,
    pub profit:           f64,
}

impl VehicleSnapshotRow {
    pub const HEADERS: [&'static str; 11] = [
        "vehicle_id",
        "step",
        "role",
        "phase",
        "node",
        "lat",
        "lon",
        "cargo_load",
        "capacity",
        "committed_parcel",
        "profit",
    ];

    pub fn from_snapshot(step: u64, s: &VehicleSnapshot) -> Self {
        Self {
            vehicle_id:       s.vehicle.0,
            step,
            role:             s.role.as_str(),
            phase:            phase_name(s.phase),
            node:             s.node.unwrap_or(NodeId::INVALID).0,
            lat:              s.geo.lat,
            lon:              s.geo.lon,
            cargo_load:       s.cargo_load,
            capacity:         s.capacity,
            committed_parcel: s.committed.unwrap_or(ParcelId::INVALID).0,
            profit:           s.profit,
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Seeking          => "seeking",
        Phase::Committed(_)     => "committed",
        Phase::ReturningToDepot => "returning_to_depot",
        Phase::Loading(_)       => "loading",
    }
}

/// Fleet-wide totals for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:         u64,
    pub elapsed_ms:   u64,
    pub total_profit: f64,
    pub available:    u64,
    pub in_cargo:     u64,
    pub at_depot:     u64,
    pub delivered:    u64,
    pub pickups:      u64,
    pub deliveries:   u64,
    pub contentions:  u64,
}

impl StepSummaryRow {
    pub const HEADERS: [&'static str; 10] = [
        "step",
        "elapsed_ms",
        "total_profit",
        "available",
        "in_cargo",
        "at_depot",
        "delivered",
        "pickups",
        "deliveries",
        "contentions",
    ];
}

impl From<&StepSummary> for StepSummaryRow {
    fn from(s: &StepSummary) -> Self {
        Self {
            step:         s.step.0,
            elapsed_ms:   s.elapsed_ms,
            total_profit: s.total_profit,
            available:    s.parcels.available as u64,
            in_cargo:     s.parcels.in_cargo as u64,
            at_depot:     s.parcels.at_depot as u64,
            delivered:    s.parcels.delivered as u64,
            pickups:      s.events.pickups as u64,
            deliveries:   s.events.deliveries as u64,
            contentions:  s.events.contentions as u64,
        }
    }
}
