//! Rolling-window samples and series keys

use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, MetricName};

/// One timestamped value inside a metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Measured value.
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: u64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Key of a metric series: one series per (entity, metric) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub entity_id: EntityId,
    pub metric: MetricName,
}

impl SeriesKey {
    pub fn new(entity_id: EntityId, metric: MetricName) -> Self {
        Self { entity_id, metric }
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity_id, self.metric)
    }
}

/// Window-capacity class of a metric series.
///
/// Capacity is configured per class rather than per series so that a
/// new metric gets a sensible bound without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricClass {
    /// SPC-charted quality measurements.
    Spc,
    /// Machine-condition signals (vibration, temperature).
    Condition,
    /// OEE component factors.
    Oee,
    /// Production counters (pieces, cycles).
    Counter,
}
