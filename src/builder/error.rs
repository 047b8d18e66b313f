//! Build errors for machines and dispatchers.

use thiserror::Error;

/// Errors that can occur when building machines and dispatchers.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dispatch handler not specified. Call .dispatch(handler) before .build()")]
    MissingDispatch,

    #[error("Stream capacity must be at least 1")]
    ZeroStreamCapacity,

    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
