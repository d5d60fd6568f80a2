//! `cs-world` — the simulated world the dispatch core acts upon.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`road`]     | `RoadState`, `Track` — per-vehicle position and destination |
//! | [`registry`] | `ParcelRegistry`, `ParcelCounts` — containers and lifecycle |
//! | [`world`]    | `World<R>` — implements `RoadModel` and `PdpModel`          |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                              |
//!
//! # Movement
//!
//! Vehicles travel along shortest paths at constant speed.  A vehicle that
//! runs out of time mid-edge stays on that edge and must reach its far end
//! before turning; distances from such a vehicle are measured through the
//! edge's target node.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                         |
//! |-----------|------------------------------------------------|
//! | `fx-hash` | Parcel table keyed with FxHash instead of SipHash. |

pub mod error;
pub mod registry;
pub mod road;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use registry::{ParcelCounts, ParcelRegistry};
pub use road::{RoadState, Track};
pub use world::World;
