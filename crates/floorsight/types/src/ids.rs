//! Strongly-typed identifiers for pipeline entities
//!
//! Machine/line identifiers and metric names are operator-assigned
//! strings; anomaly and consumer identifiers are UUID-based. All are
//! wrapped in newtype structs for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for a monitored entity (machine, line, or cell).
///
/// Entity ids come from the shop-floor master data, e.g. `M-101` or
/// `LINE-A`, and are treated as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Name of a metric series, e.g. `diameter`, `vibration`, `spindle_temp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricName(String);

impl MetricName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an anomaly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnomalyId(Uuid);

impl AnomalyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AnomalyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anomaly:{}", self.0)
    }
}

/// Unique identifier for a dashboard consumer subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumerId(Uuid);

impl ConsumerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_prefixed() {
        let id = EntityId::new("M-101");
        assert_eq!(format!("{}", id), "entity:M-101");
        assert_eq!(id.as_str(), "M-101");
    }

    #[test]
    fn anomaly_ids_unique() {
        let a = AnomalyId::generate();
        let b = AnomalyId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn consumer_id_display() {
        let id = ConsumerId::generate();
        assert!(format!("{}", id).starts_with("consumer:"));
    }

    #[test]
    fn metric_name_round_trip() {
        let name = MetricName::new("vibration");
        let json = serde_json::to_string(&name).unwrap();
        let restored: MetricName = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, name);
    }
}
