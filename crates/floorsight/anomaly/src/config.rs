//! Anomaly generator configuration

use std::collections::HashMap;

use floorsight_types::MetricName;
use serde::{Deserialize, Serialize};

/// Alert band of a condition metric; values outside raise a
/// `MetricOutOfBounds` anomaly. Distinct from ingest schema bounds,
/// which reject physically impossible readings outright.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertBounds {
    pub min: f64,
    pub max: f64,
}

impl AlertBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Normalized deviation of a value outside the band, 0 when
    /// inside.
    pub fn deviation(&self, value: f64) -> f64 {
        let span = (self.max - self.min).max(f64::EPSILON);
        if value > self.max {
            (value - self.max) / span
        } else if value < self.min {
            (self.min - value) / span
        } else {
            0.0
        }
    }
}

/// Configuration of the anomaly generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Consecutive condition-false ticks tolerated after the first
    /// miss before a record is fully retired.
    pub cool_down_ticks: u64,

    /// Maximum active records per entity; the lowest-severity oldest
    /// record is evicted to make room.
    pub max_active_per_entity: usize,

    /// Retired records kept per entity, oldest dropped.
    pub history_capacity: usize,

    /// Insight list length.
    pub top_k_insights: usize,

    /// Alert bands per condition metric.
    pub alert_bounds: HashMap<MetricName, AlertBounds>,

    /// Minimum progress velocity in percent per minute; slower
    /// entities raise a `ThroughputShortfall`.
    pub min_progress_rate_per_min: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        let mut alert_bounds = HashMap::new();
        alert_bounds.insert(MetricName::new("vibration"), AlertBounds::new(0.0, 2.5));
        alert_bounds.insert(MetricName::new("spindle_temp"), AlertBounds::new(0.0, 65.0));

        Self {
            cool_down_ticks: 2,
            max_active_per_entity: 8,
            history_capacity: 32,
            top_k_insights: 5,
            alert_bounds,
            min_progress_rate_per_min: 0.5,
        }
    }
}
