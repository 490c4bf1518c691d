//! Broker configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the subscription broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Subscribers that have not polled for this long are reaped at
    /// the next tick boundary, bounding broker memory.
    pub idle_timeout: Duration,

    /// Retained anomaly updates; beyond this the oldest-sequence
    /// entries are dropped (their records were published long ago).
    pub anomaly_retention: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            anomaly_retention: 1024,
        }
    }
}
