//! Error types for the runtime facade

use floorsight_broker::BrokerError;
use thiserror::Error;

/// Errors surfaced by the runtime facade.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Subscription operation on an unknown handle.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// The scheduler was started twice.
    #[error("tick scheduler already running")]
    AlreadyRunning,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
