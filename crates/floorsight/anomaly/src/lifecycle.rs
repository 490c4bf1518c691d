//! Per-(entity, category) anomaly lifecycle
//!
//! Quiescent -> Active -> Retiring -> Quiescent. A tracker exists
//! only while its record is active or retiring; Quiescent is the
//! absence of a tracker. Re-activation during the cool-down reverts
//! to Active on the same record, so flapping never duplicates ids.

use floorsight_types::{AnomalyCategory, AnomalyRecord, EntityId};

/// Observable phase of a tracked condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Condition observed true on the latest tick.
    Active,
    /// Condition false for at least one tick, cool-down running.
    Retiring,
}

/// Live state of one (entity, category) condition.
#[derive(Debug, Clone)]
pub struct Tracker {
    pub record: AnomalyRecord,
    /// Consecutive ticks the condition has been false.
    misses: u64,
}

impl Tracker {
    pub fn new(entity_id: EntityId, category: AnomalyCategory, severity: f64, tick: u64) -> Self {
        Self {
            record: AnomalyRecord::new(entity_id, category, severity, tick),
            misses: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.misses == 0 {
            Phase::Active
        } else {
            Phase::Retiring
        }
    }

    /// Condition observed true: refresh severity and last-seen. A
    /// retiring tracker reverts to Active with its id unchanged.
    pub fn hit(&mut self, severity: f64, tick: u64) {
        if self.misses > 0 {
            tracing::debug!(id = %self.record.id, "anomaly re-activated within cool-down");
        }
        self.misses = 0;
        self.record.touch(severity, tick);
    }

    /// Condition observed false this tick. Returns `true` once the
    /// cool-down has fully elapsed and the record should retire:
    /// one miss enters Retiring, `cool_down_ticks` further misses
    /// complete it.
    pub fn miss(&mut self, cool_down_ticks: u64) -> bool {
        self.misses += 1;
        self.misses > cool_down_ticks
    }
}
