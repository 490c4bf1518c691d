//! The anomaly generator
//!
//! Owns every tracker and the bounded per-entity history. Evaluation
//! runs once per tick with the conditions reported by the rules; the
//! records touched during a tick are returned so the broker can
//! publish them.

use std::collections::{HashMap, HashSet, VecDeque};

use floorsight_types::{AnomalyCategory, AnomalyId, AnomalyRecord, EntityId, InsightItem};

use crate::config::AnomalyConfig;
use crate::insight::build_insights;
use crate::lifecycle::{Phase, Tracker};
use crate::rules::ConditionReport;

/// Tracks anomaly lifecycles and projects ranked insights.
pub struct AnomalyGenerator {
    config: AnomalyConfig,
    trackers: HashMap<(EntityId, AnomalyCategory), Tracker>,
    history: HashMap<EntityId, VecDeque<AnomalyRecord>>,
}

impl AnomalyGenerator {
    pub fn new(config: AnomalyConfig) -> Self {
        Self {
            config,
            trackers: HashMap::new(),
            history: HashMap::new(),
        }
    }

    /// Advance the lifecycle of one entity's conditions by one tick.
    ///
    /// Returns clones of every record changed this tick: created,
    /// refreshed, or retired.
    pub fn evaluate(
        &mut self,
        entity_id: &EntityId,
        reports: &[ConditionReport],
        tick: u64,
    ) -> Vec<AnomalyRecord> {
        let mut changed = Vec::new();
        let reported: HashSet<AnomalyCategory> =
            reports.iter().map(|r| r.category).collect();

        for report in reports {
            let key = (entity_id.clone(), report.category);
            match self.trackers.get_mut(&key) {
                Some(tracker) => {
                    tracker.hit(report.severity(), tick);
                    changed.push(tracker.record.clone());
                }
                None => {
                    if let Some(evicted) = self.make_room(entity_id) {
                        changed.push(evicted);
                    }
                    let tracker =
                        Tracker::new(entity_id.clone(), report.category, report.severity(), tick);
                    tracing::info!(
                        entity = %entity_id,
                        category = %report.category,
                        id = %tracker.record.id,
                        severity = tracker.record.severity,
                        "anomaly raised"
                    );
                    changed.push(tracker.record.clone());
                    self.trackers.insert(key, tracker);
                }
            }
        }

        // Conditions not reported this tick progress toward retirement.
        let mut retired_keys = Vec::new();
        for (key, tracker) in self.trackers.iter_mut() {
            if key.0 == *entity_id && !reported.contains(&key.1) {
                if tracker.miss(self.config.cool_down_ticks) {
                    retired_keys.push(key.clone());
                }
            }
        }
        for key in retired_keys {
            if let Some(tracker) = self.trackers.remove(&key) {
                changed.push(self.retire(tracker));
            }
        }

        changed
    }

    /// Evict the lowest-severity, oldest active record if the entity
    /// is at capacity; the evicted record retires immediately.
    fn make_room(&mut self, entity_id: &EntityId) -> Option<AnomalyRecord> {
        let active: Vec<(AnomalyCategory, f64, u64)> = self
            .trackers
            .iter()
            .filter(|(key, _)| key.0 == *entity_id)
            .map(|(key, tracker)| {
                (
                    key.1,
                    tracker.record.severity,
                    tracker.record.first_seen_tick,
                )
            })
            .collect();
        if active.len() < self.config.max_active_per_entity {
            return None;
        }

        let victim = active
            .into_iter()
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.2.cmp(&b.2))
            })
            .map(|(category, _, _)| category)?;

        let tracker = self.trackers.remove(&(entity_id.clone(), victim))?;
        tracing::debug!(
            entity = %entity_id,
            category = %victim,
            "active anomaly evicted at capacity"
        );
        Some(self.retire(tracker))
    }

    fn retire(&mut self, mut tracker: Tracker) -> AnomalyRecord {
        tracker.record.active = false;
        tracing::info!(
            entity = %tracker.record.entity_id,
            id = %tracker.record.id,
            "anomaly retired"
        );
        let ring = self
            .history
            .entry(tracker.record.entity_id.clone())
            .or_default();
        if ring.len() == self.config.history_capacity {
            ring.pop_front();
        }
        ring.push_back(tracker.record.clone());
        tracker.record
    }

    /// Mark a record acknowledged; returns false for unknown or
    /// already-retired ids.
    pub fn acknowledge(&mut self, anomaly_id: AnomalyId) -> bool {
        for tracker in self.trackers.values_mut() {
            if tracker.record.id == anomaly_id {
                tracker.record.acknowledged = true;
                tracing::info!(id = %anomaly_id, "anomaly acknowledged");
                return true;
            }
        }
        false
    }

    /// Active record count for an entity, the risk-score input.
    pub fn active_count(&self, entity_id: &EntityId) -> usize {
        self.trackers.keys().filter(|key| key.0 == *entity_id).count()
    }

    /// Clones of every active record, across all entities.
    pub fn active_records(&self) -> Vec<AnomalyRecord> {
        self.trackers
            .values()
            .map(|tracker| tracker.record.clone())
            .collect()
    }

    /// Observable phase of one condition, if tracked at all.
    pub fn phase(&self, entity_id: &EntityId, category: AnomalyCategory) -> Option<Phase> {
        self.trackers
            .get(&(entity_id.clone(), category))
            .map(Tracker::phase)
    }

    /// Retired records of an entity, oldest first.
    pub fn history(&self, entity_id: &EntityId) -> Vec<AnomalyRecord> {
        self.history
            .get(entity_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Ranked top-K insight projection over the active set.
    pub fn insights(&self) -> Vec<InsightItem> {
        build_insights(&self.active_records(), self.config.top_k_insights)
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }
}
