//! `cs-spatial` — road network, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`router`]  | `Router` trait, `Path`, `DijkstraRouter`                    |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! Vehicles follow network geometry, so every distance the dispatch core
//! sees is a shortest-path length from this crate, never a straight line.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Path, Router};
