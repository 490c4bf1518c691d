//! Declared metric schemas and range validation
//!
//! A reading is validated against the schema registered for its
//! metric; metrics without an explicit schema fall back to the
//! declared bounds of the unit carried by the event.

use std::collections::HashMap;

use floorsight_types::{MetricName, Unit};
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Declared unit and acceptable range of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSchema {
    pub unit: Unit,
    pub min: f64,
    pub max: f64,
}

impl MetricSchema {
    /// Schema spanning the full declared range of a unit.
    pub fn for_unit(unit: Unit) -> Self {
        let (min, max) = unit.bounds();
        Self { unit, min, max }
    }

    /// Schema with bounds tighter than the unit's physical range.
    pub fn bounded(unit: Unit, min: f64, max: f64) -> Self {
        Self { unit, min, max }
    }
}

/// Registry of declared schemas, keyed by metric name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<MetricName, MetricSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the standard shop-floor metrics.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MetricName::new("diameter"), MetricSchema::bounded(Unit::Mm, 5.0, 15.0));
        registry.register(
            MetricName::new("vibration"),
            MetricSchema::for_unit(Unit::MmPerSec),
        );
        registry.register(
            MetricName::new("spindle_temp"),
            MetricSchema::for_unit(Unit::Celsius),
        );
        for factor in ["availability", "performance", "quality", "progress"] {
            registry.register(MetricName::new(factor), MetricSchema::for_unit(Unit::Percent));
        }
        for counter in ["good_count", "scrap_count"] {
            registry.register(MetricName::new(counter), MetricSchema::for_unit(Unit::Count));
        }
        registry
    }

    pub fn register(&mut self, metric: MetricName, schema: MetricSchema) {
        self.schemas.insert(metric, schema);
    }

    pub fn get(&self, metric: &MetricName) -> Option<&MetricSchema> {
        self.schemas.get(metric)
    }

    /// Validate a reading; unknown metrics use the event unit's
    /// declared bounds.
    pub fn validate(&self, metric: &MetricName, value: f64, unit: Unit) -> Result<(), IngestError> {
        if !value.is_finite() {
            return Err(IngestError::NonFiniteValue {
                metric: metric.to_string(),
                value,
            });
        }

        let (min, max) = match self.schemas.get(metric) {
            Some(schema) => (schema.min, schema.max),
            None => unit.bounds(),
        };

        if value < min || value > max {
            return Err(IngestError::OutOfBounds {
                metric: metric.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}
