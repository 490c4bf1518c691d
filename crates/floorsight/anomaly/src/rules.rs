//! Per-tick rule evaluation
//!
//! Each rule inspects the tick's store snapshot (and the SPC status
//! already derived from it) and reports the conditions it finds true,
//! with a normalized deviation in [0, 1] that drives record severity.
//! Evaluation is pure; the generator owns all lifecycle state.

use floorsight_store::StoreSnapshot;
use floorsight_types::{AnomalyCategory, EntityId, MachineState, MetricName, SpcStatus};

use crate::config::AnomalyConfig;

/// One rule condition observed true this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionReport {
    pub category: AnomalyCategory,
    /// Normalized deviation magnitude; severity is `deviation * 100`.
    pub deviation: f64,
}

impl ConditionReport {
    pub fn new(category: AnomalyCategory, deviation: f64) -> Self {
        Self {
            category,
            deviation: deviation.clamp(0.0, 1.0),
        }
    }

    pub fn severity(&self) -> f64 {
        self.deviation * 100.0
    }
}

/// Evaluate every rule for one entity against the tick snapshot.
///
/// `spc_status` is passed in rather than recomputed so rules and the
/// derived snapshot always agree within a tick.
pub fn evaluate_rules(
    snapshot: &StoreSnapshot,
    entity_id: &EntityId,
    spc_status: SpcStatus,
    spc_watch_metric: &MetricName,
    spc_target: f64,
    spc_tolerance: f64,
    config: &AnomalyConfig,
) -> Vec<ConditionReport> {
    let mut reports = Vec::new();

    if spc_status == SpcStatus::OutOfSpec {
        let deviation = snapshot
            .latest(entity_id, spc_watch_metric)
            .map(|sample| {
                let excess = (sample.value - spc_target).abs() - spc_tolerance;
                // One full tolerance beyond the limit saturates severity.
                (excess / spc_tolerance.max(f64::EPSILON)).clamp(0.0, 1.0)
            })
            .unwrap_or(0.0);
        // Breaching the limit at all is already severe.
        reports.push(ConditionReport::new(
            AnomalyCategory::SpcViolation,
            0.5 + deviation / 2.0,
        ));
    }

    let mut worst_excess: f64 = 0.0;
    for (metric, bounds) in &config.alert_bounds {
        if let Some(sample) = snapshot.latest(entity_id, metric) {
            worst_excess = worst_excess.max(bounds.deviation(sample.value));
        }
    }
    if worst_excess > 0.0 {
        reports.push(ConditionReport::new(
            AnomalyCategory::MetricOutOfBounds,
            0.4 + worst_excess.min(1.0) * 0.6,
        ));
    }

    if snapshot.current_state(entity_id) == Some(MachineState::Alarm) {
        reports.push(ConditionReport::new(AnomalyCategory::MachineAlarm, 0.9));
    }

    if let Some(shortfall) = throughput_shortfall(snapshot, entity_id, config) {
        reports.push(ConditionReport::new(
            AnomalyCategory::ThroughputShortfall,
            shortfall,
        ));
    }

    reports
}

/// Normalized shortfall of progress velocity against the configured
/// minimum rate; `None` while data is insufficient or on target.
fn throughput_shortfall(
    snapshot: &StoreSnapshot,
    entity_id: &EntityId,
    config: &AnomalyConfig,
) -> Option<f64> {
    let window = snapshot.window(entity_id, &MetricName::new("progress"), usize::MAX);
    let first = window.first()?;
    let last = window.last()?;
    let elapsed_ms = last.timestamp_ms.saturating_sub(first.timestamp_ms);
    if elapsed_ms == 0 || config.min_progress_rate_per_min <= 0.0 {
        return None;
    }
    let rate_per_min = (last.value - first.value) / (elapsed_ms as f64 / 60_000.0);
    if rate_per_min >= config.min_progress_rate_per_min {
        return None;
    }
    let shortfall =
        (config.min_progress_rate_per_min - rate_per_min) / config.min_progress_rate_per_min;
    Some(shortfall.clamp(0.0, 1.0))
}
