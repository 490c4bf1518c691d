//! Anomaly records and insight projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AnomalyId, EntityId};

/// Rule family that raised an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyCategory {
    /// SPC status reached out-of-spec.
    SpcViolation,
    /// A metric left its declared bounds.
    MetricOutOfBounds,
    /// The machine is in the alarm state.
    MachineAlarm,
    /// Throughput fell short of the configured target rate.
    ThroughputShortfall,
}

impl std::fmt::Display for AnomalyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpcViolation => write!(f, "spc_violation"),
            Self::MetricOutOfBounds => write!(f, "metric_out_of_bounds"),
            Self::MachineAlarm => write!(f, "machine_alarm"),
            Self::ThroughputShortfall => write!(f, "throughput_shortfall"),
        }
    }
}

/// A ranked anomaly tracked by the generator.
///
/// Created when a rule fires on a fresh condition, updated while the
/// condition persists, retired (`active = false`) after the cool-down
/// elapses or on capacity eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Stable identity across the whole lifecycle, including
    /// re-activation within the cool-down.
    pub id: AnomalyId,

    /// Entity the anomaly concerns.
    pub entity_id: EntityId,

    /// Rule family that raised it.
    pub category: AnomalyCategory,

    /// Severity in [0, 100], recomputed from deviation magnitude
    /// while the condition persists.
    pub severity: f64,

    /// Tick at which the condition first fired.
    pub first_seen_tick: u64,

    /// Tick at which the condition was last observed true.
    pub last_seen_tick: u64,

    /// Wall-clock time of first observation.
    pub first_seen: DateTime<Utc>,

    /// Wall-clock time of last observation.
    pub last_seen: DateTime<Utc>,

    /// False once retired to history.
    pub active: bool,

    /// Set by operator acknowledgement; demotes insight ranking.
    pub acknowledged: bool,
}

impl AnomalyRecord {
    pub fn new(entity_id: EntityId, category: AnomalyCategory, severity: f64, tick: u64) -> Self {
        let now = Utc::now();
        Self {
            id: AnomalyId::generate(),
            entity_id,
            category,
            severity: severity.clamp(0.0, 100.0),
            first_seen_tick: tick,
            last_seen_tick: tick,
            first_seen: now,
            last_seen: now,
            active: true,
            acknowledged: false,
        }
    }

    /// Record another tick with the condition still true.
    pub fn touch(&mut self, severity: f64, tick: u64) {
        self.severity = severity.clamp(0.0, 100.0);
        self.last_seen_tick = tick;
        self.last_seen = Utc::now();
    }
}

/// One entry of the ranked, bounded insight list.
///
/// Read-only projection over active anomaly records; regenerated per
/// tick, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub entity_id: EntityId,
    pub category: AnomalyCategory,
    pub severity: f64,
    /// Short headline, e.g. "SPC out of spec on entity:M-101".
    pub headline: String,
    /// Actionable advice line for the operator.
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_active_and_clamped() {
        let r = AnomalyRecord::new(
            EntityId::new("M-101"),
            AnomalyCategory::SpcViolation,
            250.0,
            7,
        );
        assert!(r.active);
        assert!(!r.acknowledged);
        assert_eq!(r.severity, 100.0);
        assert_eq!(r.first_seen_tick, 7);
        assert_eq!(r.last_seen_tick, 7);
    }

    #[test]
    fn touch_updates_last_seen_only() {
        let mut r = AnomalyRecord::new(
            EntityId::new("M-101"),
            AnomalyCategory::MachineAlarm,
            60.0,
            3,
        );
        let id = r.id;
        r.touch(75.0, 5);
        assert_eq!(r.id, id);
        assert_eq!(r.first_seen_tick, 3);
        assert_eq!(r.last_seen_tick, 5);
        assert_eq!(r.severity, 75.0);
    }

    #[test]
    fn category_display() {
        assert_eq!(format!("{}", AnomalyCategory::SpcViolation), "spc_violation");
    }
}
