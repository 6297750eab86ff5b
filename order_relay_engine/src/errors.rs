use thiserror::Error;

use crate::traits::OrderSourceError;

/// Errors that abort handling of a single order, or a whole polling round.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("Could not list orders. {0}")]
    UpstreamFetch(#[from] OrderSourceError),
    #[error("Order record is unusable. {0}")]
    InvalidOrder(String),
    #[error("Unexpected error. {0}")]
    Unexpected(String),
}

/// Errors returned by the worker's control operations.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    #[error("The relay is misconfigured and cannot run. {0}")]
    Misconfigured(String),
    #[error("The relay is already running")]
    AlreadyRunning,
    #[error("The relay is not running")]
    NotRunning,
    #[error("There is no async runtime to run the relay on")]
    NoRuntime,
    #[error("The polling round failed. {0}")]
    Round(RelayError),
}
