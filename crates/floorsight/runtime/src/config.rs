//! Aggregate runtime configuration

use std::time::Duration;

use floorsight_anomaly::AnomalyConfig;
use floorsight_broker::BrokerConfig;
use floorsight_metrics::MetricsConfig;
use floorsight_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the whole pipeline, one section per component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorsightConfig {
    /// Gap between derived-state recomputations.
    pub tick_interval: Duration,

    /// Bound of the operator-action queue drained at tick start.
    pub action_queue_bound: usize,

    pub store: StoreConfig,
    pub metrics: MetricsConfig,
    pub anomaly: AnomalyConfig,
    pub broker: BrokerConfig,
}

impl Default for FloorsightConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            action_queue_bound: 256,
            store: StoreConfig::default(),
            metrics: MetricsConfig::default(),
            anomaly: AnomalyConfig::default(),
            broker: BrokerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        let config = FloorsightConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.anomaly.cool_down_ticks, 2);
        assert_eq!(config.anomaly.top_k_insights, 5);
        assert!(config.action_queue_bound > 0);
    }
}
