//! # Floorsight Runtime
//!
//! Wires the pipeline together and exposes the four-call surface the
//! presentation layer consumes:
//!
//! - [`FloorsightRuntime::ingest`]: validate and absorb one event
//! - [`FloorsightRuntime::subscribe`]: register a dashboard consumer
//! - [`FloorsightRuntime::poll`]: drain updates since the last poll
//! - [`FloorsightRuntime::unsubscribe`]: drop the subscription
//!
//! Derived state advances only at tick boundaries, driven by the
//! interval scheduler (or [`FloorsightRuntime::tick_once`] in tests).
//! Ingestion is event-driven and never waits on a tick.
//!
//! ```no_run
//! use floorsight_runtime::{FloorsightConfig, FloorsightRuntime};
//! use floorsight_types::EntityFilter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let runtime = FloorsightRuntime::new(FloorsightConfig::default());
//!     let handle = runtime.subscribe(EntityFilter::All);
//!     let scheduler = runtime.start().await.unwrap();
//!
//!     // ... ingest events, poll for updates ...
//!     let update = runtime.poll(handle).unwrap();
//!     println!("{} snapshots", update.snapshots.len());
//!
//!     scheduler.stop().await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod scheduler;
pub mod telemetry;

pub use config::FloorsightConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use pipeline::{TickPipeline, TickSummary};
pub use runtime::FloorsightRuntime;
pub use scheduler::TickScheduler;
