//! `cs-dispatch` — decentralized per-vehicle dispatch decisions.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                   |
//! |--------------------|------------------------------------------------------------|
//! | [`env`]            | `RoadModel`, `PdpModel` — the collaborators a vehicle sees |
//! | [`role`]           | `Role` enum (`Pickup`, `Delivery`, `Courier`)              |
//! | [`state`]          | `VehicleState`, `Commitment`, `Phase`, `VehicleSpec`       |
//! | [`cost`]           | `CostConfig`, `CostModel`                                  |
//! | [`contention`]     | `ContentionResolver`                                       |
//! | [`depot_router`]   | `DepotRouter`                                              |
//! | [`agent`]          | `VehicleAgent::decide` and the per-role decision functions |
//! | [`event`]          | `DispatchEvent` — what a vehicle did during one step       |
//! | [`error`]          | `DispatchError`, `DispatchResult<T>`                       |
//!
//! # Design notes
//!
//! A vehicle's decision is a transition over explicit state:
//!
//! ```text
//! decide(&mut VehicleState, &mut TimeLapse, &mut impl RoadModel + PdpModel) -> Vec<DispatchEvent>
//! ```
//!
//! There is no central arbiter.  Vehicles claim parcels optimistically by
//! heading for them; a vehicle that sees another vehicle's declared
//! destination on its target backs off and picks something else.  The
//! scheduler calls vehicles one after another, so no locking is needed, but
//! call order is observable within a step.

pub mod agent;
pub mod contention;
pub mod cost;
pub mod depot_router;
pub mod env;
pub mod error;
pub mod event;
pub mod role;
pub mod state;

mod courier;
mod delivery;
mod pickup;


pub use agent::VehicleAgent;
pub use contention::ContentionResolver;
pub use cost::{CostConfig, CostModel};
pub use depot_router::DepotRouter;
pub use env::{PdpModel, RoadModel};
pub use error::{DispatchError, DispatchResult};
pub use event::DispatchEvent;
pub use role::Role;
pub use state::{Commitment, Phase, VehicleSpec, VehicleState};
