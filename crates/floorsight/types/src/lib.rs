//! # Floorsight Types
//!
//! Shared data model for the Floorsight observability pipeline.
//!
//! Every type that crosses a component boundary lives here: typed
//! identifiers, telemetry events, rolling-window samples, derived
//! snapshots, anomaly records, subscription filters, and the single
//! injectable sequence counter used for subscriber cursors.
//!
//! All entities are single-writer: only the owning component mutates
//! them, and consumers always receive owned copies, never references
//! into live mutable state.

pub mod anomaly;
pub mod event;
pub mod ids;
pub mod sample;
pub mod sequence;
pub mod snapshot;
pub mod subscription;

pub use anomaly::{AnomalyCategory, AnomalyRecord, InsightItem};
pub use event::{
    DefectCategory, DowntimeReason, EventKind, EventPayload, EventRecord, MachineState,
    OperatorAction, Unit,
};
pub use ids::{AnomalyId, ConsumerId, EntityId, MetricName};
pub use sample::{MetricClass, Sample, SeriesKey};
pub use sequence::Sequencer;
pub use snapshot::{DerivedSnapshot, OeeComponents, SpcStatus};
pub use subscription::{EntityFilter, PollUpdate, SubscriptionHandle};
