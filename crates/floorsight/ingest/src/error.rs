//! Error types for ingestion

use thiserror::Error;

/// Acknowledgement of an accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// Sequence number stamped on acceptance; subscriber cursors are
    /// ordered by the same counter.
    pub seq: u64,
}

/// Why an event was rejected.
///
/// Every variant is non-fatal: the event is logged and dropped, and
/// the pipeline keeps running for all other entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// Reading value is NaN or infinite.
    #[error("non-finite value {value} for metric {metric}")]
    NonFiniteValue { metric: String, value: f64 },

    /// Reading value outside the declared unit bounds.
    #[error("value {value} for metric {metric} outside declared bounds [{min}, {max}]")]
    OutOfBounds {
        metric: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Timestamp older than the newest event accepted for the same
    /// (entity, metric) key.
    #[error("stale timestamp {got}ms for {key}: newest accepted is {newest}ms")]
    StaleTimestamp { key: String, got: u64, newest: u64 },

    /// Operator-action queue is at capacity.
    #[error("operator action queue full (capacity {capacity})")]
    ActionQueueFull { capacity: usize },
}

/// Result type for ingest operations.
pub type IngestResult = Result<Accepted, IngestError>;
