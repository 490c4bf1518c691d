//! Store configuration
//!
//! Window capacity is configured per metric class rather than per
//! series, so a metric seen for the first time gets a sensible bound
//! without registration. Explicit per-metric overrides win over the
//! class default.

use std::collections::HashMap;

use floorsight_types::{MetricClass, MetricName};
use serde::{Deserialize, Serialize};

/// Ring capacity per metric class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowCapacities {
    /// SPC-charted quality measurements.
    pub spc: usize,

    /// Machine-condition signals (vibration, temperature).
    pub condition: usize,

    /// OEE component factors.
    pub oee: usize,

    /// Production counters.
    pub counter: usize,
}

impl Default for WindowCapacities {
    fn default() -> Self {
        Self {
            spc: 30,
            condition: 20,
            oee: 60,
            counter: 100,
        }
    }
}

impl WindowCapacities {
    pub fn for_class(&self, class: MetricClass) -> usize {
        match class {
            MetricClass::Spc => self.spc,
            MetricClass::Condition => self.condition,
            MetricClass::Oee => self.oee,
            MetricClass::Counter => self.counter,
        }
    }
}

/// Configuration for the metric store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Capacity per metric class.
    pub capacities: WindowCapacities,

    /// Class assignment for metrics that are not in the override map.
    pub default_class: MetricClass,

    /// Explicit metric-to-class assignments.
    pub class_overrides: HashMap<MetricName, MetricClass>,

    /// Capacity of the per-entity machine-state log.
    pub state_log_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let mut class_overrides = HashMap::new();
        class_overrides.insert(MetricName::new("diameter"), MetricClass::Spc);
        class_overrides.insert(MetricName::new("vibration"), MetricClass::Condition);
        class_overrides.insert(MetricName::new("spindle_temp"), MetricClass::Condition);
        class_overrides.insert(MetricName::new("availability"), MetricClass::Oee);
        class_overrides.insert(MetricName::new("performance"), MetricClass::Oee);
        class_overrides.insert(MetricName::new("quality"), MetricClass::Oee);
        class_overrides.insert(MetricName::new("good_count"), MetricClass::Counter);
        class_overrides.insert(MetricName::new("scrap_count"), MetricClass::Counter);
        class_overrides.insert(MetricName::new("progress"), MetricClass::Counter);

        Self {
            capacities: WindowCapacities::default(),
            default_class: MetricClass::Condition,
            class_overrides,
            state_log_capacity: 64,
        }
    }
}

impl StoreConfig {
    /// Resolve the metric class of a series.
    pub fn class_of(&self, metric: &MetricName) -> MetricClass {
        self.class_overrides
            .get(metric)
            .copied()
            .unwrap_or(self.default_class)
    }

    /// Resolve the ring capacity of a series.
    pub fn capacity_of(&self, metric: &MetricName) -> usize {
        self.capacities.for_class(self.class_of(metric))
    }
}
