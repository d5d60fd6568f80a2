use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("vehicle speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),

    #[error("vehicle capacity must be positive")]
    ZeroCapacity,

    #[error("cost configuration error: {0}")]
    Cost(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
