//! The rolling metric store
//!
//! Series for distinct (entity, metric) keys are fully independent:
//! `DashMap` sharding serializes same-key writers while letting
//! ingestion interleave freely across keys. Derived computation never
//! reads the live map during a tick; it takes a [`StoreSnapshot`] at
//! tick start and works on owned copies.

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use floorsight_types::{EntityId, MachineState, MetricName, Sample, SeriesKey};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::ring::RingWindow;
use crate::state_log::{StateEntry, StateLog};

/// Owner of all rolling series and machine-state logs.
pub struct MetricStore {
    config: StoreConfig,
    series: DashMap<SeriesKey, RingWindow>,
    states: DashMap<EntityId, StateLog>,
}

impl MetricStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            series: DashMap::new(),
            states: DashMap::new(),
        }
    }

    /// Insert a sample into the series for (entity, metric).
    ///
    /// The series is created lazily with the capacity of its metric
    /// class. Stale timestamps are rejected and leave the series
    /// untouched; eviction at capacity is silent policy.
    pub fn insert(
        &self,
        entity_id: EntityId,
        metric: MetricName,
        timestamp_ms: u64,
        value: f64,
    ) -> StoreResult<()> {
        let key = SeriesKey::new(entity_id, metric);
        let capacity = self.config.capacity_of(&key.metric);
        let mut ring = self
            .series
            .entry(key.clone())
            .or_insert_with(|| RingWindow::new(capacity));

        match ring.push(Sample::new(timestamp_ms, value)) {
            Ok(evicted) => {
                if evicted {
                    tracing::trace!(series = %key, "oldest sample evicted at capacity");
                }
                Ok(())
            }
            Err(newest) => Err(StoreError::OutOfOrder {
                key,
                got: timestamp_ms,
                newest,
            }),
        }
    }

    /// Record a machine-state transition for an entity.
    pub fn record_state(
        &self,
        entity_id: EntityId,
        timestamp_ms: u64,
        state: MachineState,
    ) -> StoreResult<()> {
        let mut log = self
            .states
            .entry(entity_id.clone())
            .or_insert_with(|| StateLog::new(self.config.state_log_capacity));

        log.push(timestamp_ms, state).map_err(|newest| {
            StoreError::OutOfOrder {
                key: SeriesKey::new(entity_id, MetricName::new("machine_state")),
                got: timestamp_ms,
                newest,
            }
        })
    }

    /// The newest `count` samples of a series, oldest first.
    ///
    /// A fresh copy on every call; identical across repeated calls
    /// until the next insert. Unknown series yield an empty window.
    pub fn window(&self, entity_id: &EntityId, metric: &MetricName, count: usize) -> Vec<Sample> {
        let key = SeriesKey::new(entity_id.clone(), metric.clone());
        self.series
            .get(&key)
            .map(|ring| ring.window(count))
            .unwrap_or_default()
    }

    /// The newest sample of a series, if any.
    pub fn latest(&self, entity_id: &EntityId, metric: &MetricName) -> Option<Sample> {
        let key = SeriesKey::new(entity_id.clone(), metric.clone());
        self.series.get(&key).and_then(|ring| ring.newest())
    }

    /// Every entity that has at least one series or state log.
    pub fn entities(&self) -> Vec<EntityId> {
        let mut out: HashSet<EntityId> = self
            .series
            .iter()
            .map(|entry| entry.key().entity_id.clone())
            .collect();
        out.extend(self.states.iter().map(|entry| entry.key().clone()));
        let mut sorted: Vec<EntityId> = out.into_iter().collect();
        sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        sorted
    }

    /// Consistent copy of every series and state log, taken at tick
    /// start so derived computation never blocks ingestion.
    pub fn snapshot(&self) -> StoreSnapshot {
        let series = self
            .series
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().window(usize::MAX)))
            .collect();
        let states = self
            .states
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        StoreSnapshot { series, states }
    }
}

/// Immutable copy of store state as of one tick boundary.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    series: HashMap<SeriesKey, Vec<Sample>>,
    states: HashMap<EntityId, StateLog>,
}

impl StoreSnapshot {
    /// The newest `count` samples of a series, oldest first.
    pub fn window(&self, entity_id: &EntityId, metric: &MetricName, count: usize) -> &[Sample] {
        let key = SeriesKey::new(entity_id.clone(), metric.clone());
        match self.series.get(&key) {
            Some(samples) => {
                let take = count.min(samples.len());
                &samples[samples.len() - take..]
            }
            None => &[],
        }
    }

    /// The newest sample of a series.
    pub fn latest(&self, entity_id: &EntityId, metric: &MetricName) -> Option<Sample> {
        let key = SeriesKey::new(entity_id.clone(), metric.clone());
        self.series.get(&key).and_then(|s| s.last().copied())
    }

    /// Machine-state history of an entity, oldest first.
    pub fn state_entries(&self, entity_id: &EntityId) -> Vec<StateEntry> {
        self.states
            .get(entity_id)
            .map(|log| log.entries())
            .unwrap_or_default()
    }

    /// Current machine state of an entity.
    pub fn current_state(&self, entity_id: &EntityId) -> Option<MachineState> {
        self.states.get(entity_id).and_then(|log| log.current())
    }

    /// Run-time fraction of an entity's logged state history.
    pub fn run_occupancy(&self, entity_id: &EntityId) -> Option<f64> {
        self.states.get(entity_id).and_then(|log| log.run_occupancy())
    }

    /// Entities present in this snapshot, sorted for determinism.
    pub fn entities(&self) -> Vec<EntityId> {
        let mut out: HashSet<EntityId> = self
            .series
            .keys()
            .map(|key| key.entity_id.clone())
            .collect();
        out.extend(self.states.keys().cloned());
        let mut sorted: Vec<EntityId> = out.into_iter().collect();
        sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        sorted
    }
}
