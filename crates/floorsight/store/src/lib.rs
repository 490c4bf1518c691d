//! # Floorsight Store
//!
//! Rolling time-windowed metric storage for the observability
//! pipeline. Each (entity, metric) pair owns an independent
//! fixed-capacity ring of samples with strict FIFO eviction: O(1)
//! insert, O(1) amortized eviction, no reallocation after warm-up.
//!
//! The store is the single writer of all series; readers take
//! immutable snapshot copies, so no lock is held across derived-metric
//! computation.

pub mod config;
pub mod error;
pub mod ring;
pub mod state_log;
pub mod store;

pub use config::{StoreConfig, WindowCapacities};
pub use error::{StoreError, StoreResult};
pub use ring::RingWindow;
pub use state_log::{StateEntry, StateLog};
pub use store::{MetricStore, StoreSnapshot};
