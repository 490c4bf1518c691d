//! Error types for the metric store

use floorsight_types::SeriesKey;
use thiserror::Error;

/// Errors that can occur on store mutation.
///
/// Capacity eviction is deliberately absent: dropping the oldest
/// sample at capacity is policy, not a failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert carried a timestamp older than the newest accepted
    /// sample for the same series; the series is left untouched.
    #[error("out-of-order insert on {key}: got {got}ms, newest is {newest}ms")]
    OutOfOrder {
        key: SeriesKey,
        got: u64,
        newest: u64,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
