//! # Floorsight Ingest
//!
//! Entry point of the telemetry pipeline: validates raw events
//! against declared metric schemas, stamps accepted events with the
//! process-wide sequence counter, and forwards them to the rolling
//! metric store. Rejection is always local and non-fatal; a malformed
//! event is logged and dropped, never allowed to halt ingestion for
//! other entities.
//!
//! Event delivery is abstracted behind [`EventSource`] so production
//! code never depends on where events come from: a live feed, a
//! replayed log, or the seeded synthetic generator used in tests.

pub mod error;
pub mod ingestor;
pub mod schema;
pub mod source;

pub use error::{Accepted, IngestError, IngestResult};
pub use ingestor::EventIngestor;
pub use schema::{MetricSchema, SchemaRegistry};
pub use source::{pump, ChannelSource, EventSource, ReplaySource, SyntheticConfig, SyntheticSource};
