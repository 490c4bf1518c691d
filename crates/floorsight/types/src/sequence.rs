//! Process-wide monotonic sequence counter
//!
//! The only shared service in the pipeline: the ingestor stamps
//! accepted events with it and the broker stamps publications, so
//! subscriber cursors order both streams consistently. Injected
//! explicitly through constructors; there is no global instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cheaply cloneable monotonic counter.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    counter: Arc<AtomicU64>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number, starting at 1.
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently allocated sequence number (0 before any).
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
