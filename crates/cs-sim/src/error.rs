use cs_core::CoreError;
use cs_dispatch::DispatchError;
use cs_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("spawner configuration error: {0}")]
    Spawn(String),

    #[error("dispatch configuration error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("world setup error: {0}")]
    World(#[from] WorldError),
}

pub type SimResult<T> = Result<T, SimError>;
