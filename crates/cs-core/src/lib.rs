//! `cs-core` — foundational types for the `courier_sim` fleet simulator.
//!
//! This crate is a dependency of every other `cs-*` crate.  It has no `cs-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `ParcelId`, `DepotId`, `NodeId`, `EdgeId`     |
//! | [`geo`]         | `GeoPoint`, haversine distance, interpolation              |
//! | [`time`]        | `Step`, `TimeLapse`, `SimClock`, `SimConfig`               |
//! | [`cargo`]       | `Parcel`, `ParcelState`, `Depot`, `Container`, `Position`  |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                           |
//! | [`error`]       | `CoreError`, `PdpError` and their result aliases           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cargo;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cargo::{Container, Depot, Parcel, ParcelState, Position};
pub use error::{CoreError, CoreResult, PdpError, PdpResult};
pub use geo::GeoPoint;
pub use ids::{DepotId, EdgeId, NodeId, ParcelId, VehicleId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Step, TimeLapse};
