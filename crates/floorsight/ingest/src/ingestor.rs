//! The event ingestor
//!
//! Single entry point for raw telemetry. On acceptance an event is
//! stamped with the next process-wide sequence number and forwarded:
//! readings to the metric store, state changes to the state log,
//! operator actions to a bounded queue drained at the next tick
//! boundary.

use std::collections::VecDeque;
use std::sync::Arc;

use floorsight_store::{MetricStore, StoreError};
use floorsight_types::{EntityId, EventPayload, EventRecord, OperatorAction, Sequencer};
use parking_lot::Mutex;

use crate::error::{Accepted, IngestError, IngestResult};
use crate::schema::SchemaRegistry;

/// Default bound of the operator-action queue.
pub const DEFAULT_ACTION_QUEUE_BOUND: usize = 256;

/// Validates and routes incoming telemetry events.
pub struct EventIngestor {
    store: Arc<MetricStore>,
    schemas: SchemaRegistry,
    sequencer: Sequencer,
    actions: Mutex<VecDeque<(EntityId, OperatorAction)>>,
    action_bound: usize,
}

impl EventIngestor {
    pub fn new(store: Arc<MetricStore>, schemas: SchemaRegistry, sequencer: Sequencer) -> Self {
        Self::with_action_bound(store, schemas, sequencer, DEFAULT_ACTION_QUEUE_BOUND)
    }

    pub fn with_action_bound(
        store: Arc<MetricStore>,
        schemas: SchemaRegistry,
        sequencer: Sequencer,
        action_bound: usize,
    ) -> Self {
        Self {
            store,
            schemas,
            sequencer,
            actions: Mutex::new(VecDeque::new()),
            action_bound: action_bound.max(1),
        }
    }

    /// Validate one event and forward it into the pipeline.
    ///
    /// Rejected events are logged and dropped; the error is also
    /// returned so callers that care (tests, conformance checks) can
    /// observe the reason.
    pub fn ingest(&self, event: EventRecord) -> IngestResult {
        let outcome = self.route(&event);
        match &outcome {
            Ok(accepted) => {
                tracing::debug!(
                    source = %event.source_id,
                    kind = %event.kind(),
                    seq = accepted.seq,
                    "event accepted"
                );
            }
            Err(reason) => {
                tracing::warn!(
                    source = %event.source_id,
                    kind = %event.kind(),
                    %reason,
                    "event rejected"
                );
            }
        }
        outcome
    }

    fn route(&self, event: &EventRecord) -> IngestResult {
        match &event.payload {
            EventPayload::Reading {
                metric,
                value,
                unit,
            } => {
                self.schemas.validate(metric, *value, *unit)?;
                self.store
                    .insert(
                        event.source_id.clone(),
                        metric.clone(),
                        event.occurred_at_ms,
                        *value,
                    )
                    .map_err(map_store_error)?;
            }
            EventPayload::State { state } => {
                self.store
                    .record_state(event.source_id.clone(), event.occurred_at_ms, *state)
                    .map_err(map_store_error)?;
            }
            EventPayload::Operator { action } => {
                let mut queue = self.actions.lock();
                if queue.len() >= self.action_bound {
                    return Err(IngestError::ActionQueueFull {
                        capacity: self.action_bound,
                    });
                }
                queue.push_back((event.source_id.clone(), action.clone()));
            }
        }

        Ok(Accepted {
            seq: self.sequencer.next(),
        })
    }

    /// Take every queued operator action, oldest first.
    ///
    /// Called once per tick by the pipeline so action effects are
    /// applied at deterministic boundaries.
    pub fn drain_actions(&self) -> Vec<(EntityId, OperatorAction)> {
        self.actions.lock().drain(..).collect()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }
}

fn map_store_error(err: StoreError) -> IngestError {
    match err {
        StoreError::OutOfOrder { key, got, newest } => IngestError::StaleTimestamp {
            key: key.to_string(),
            got,
            newest,
        },
    }
}
