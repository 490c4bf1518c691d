//! Error types for the subscription broker

use floorsight_types::SubscriptionHandle;
use thiserror::Error;

/// Errors surfaced to broker callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Poll or unsubscribe on a handle that does not exist (never
    /// subscribed, already unsubscribed, or reaped for idleness).
    #[error("unknown subscription {0}")]
    UnknownSubscription(SubscriptionHandle),
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
