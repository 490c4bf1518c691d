//! Derived-metric configuration
//!
//! The SPC drift heuristic and the risk weights are deliberate policy
//! parameters, not hard-coded business logic; deployments tune them
//! here.

use std::collections::HashMap;

use floorsight_types::MetricName;
use serde::{Deserialize, Serialize};

/// Control limits of one SPC-charted metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpcLimits {
    /// Process target value.
    pub target: f64,
    /// Symmetric tolerance; control limits are target +/- tolerance.
    pub tolerance: f64,
}

impl SpcLimits {
    pub fn new(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    pub fn upper(&self) -> f64 {
        self.target + self.tolerance
    }

    pub fn lower(&self) -> f64 {
        self.target - self.tolerance
    }
}

/// SPC evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpcConfig {
    /// Metric whose series drives the entity's SPC status.
    pub watch_metric: MetricName,

    /// Per-metric control limits; the watch metric must be present
    /// here or `default_limits` is used.
    pub limits: HashMap<MetricName, SpcLimits>,

    /// Limits applied to metrics without an explicit entry.
    pub default_limits: SpcLimits,

    /// Consecutive same-direction samples required to call a drift
    /// warning.
    pub trend_length: usize,

    /// Fraction of the tolerance within which drifting samples must
    /// approach a limit to count as a warning.
    pub drift_band: f64,
}

impl Default for SpcConfig {
    fn default() -> Self {
        let mut limits = HashMap::new();
        limits.insert(MetricName::new("diameter"), SpcLimits::new(10.00, 0.05));

        Self {
            watch_metric: MetricName::new("diameter"),
            limits,
            default_limits: SpcLimits::new(10.00, 0.05),
            trend_length: 3,
            drift_band: 0.5,
        }
    }
}

impl SpcConfig {
    pub fn limits_for(&self, metric: &MetricName) -> SpcLimits {
        self.limits.get(metric).copied().unwrap_or(self.default_limits)
    }
}

/// Which series feed the three OEE factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OeeSourcesConfig {
    /// Fallback series for availability when an entity has no
    /// machine-state log to compute occupancy from.
    pub availability_metric: MetricName,

    /// Series for the performance factor.
    pub performance_metric: MetricName,

    /// Series for the quality factor; when absent, quality falls back
    /// to good/(good+scrap) from the counter series.
    pub quality_metric: MetricName,

    /// Good-piece counter used by the quality fallback.
    pub good_count_metric: MetricName,

    /// Scrap counter used by the quality fallback.
    pub scrap_count_metric: MetricName,

    /// Samples averaged per factor; smooths single-sample noise out
    /// of the headline number.
    pub smoothing_window: usize,
}

impl Default for OeeSourcesConfig {
    fn default() -> Self {
        Self {
            availability_metric: MetricName::new("availability"),
            performance_metric: MetricName::new("performance"),
            quality_metric: MetricName::new("quality"),
            good_count_metric: MetricName::new("good_count"),
            scrap_count_metric: MetricName::new("scrap_count"),
            smoothing_window: 10,
        }
    }
}

/// Risk-score policy: base plus a weight per active anomaly, clamped
/// to [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskConfig {
    pub base_risk: f64,
    pub per_anomaly_weight: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base_risk: 10.0,
            per_anomaly_weight: 15.0,
        }
    }
}

/// Aggregate configuration of the derived-metric engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub oee: OeeSourcesConfig,
    pub spc: SpcConfig,
    pub risk: RiskConfig,
}
