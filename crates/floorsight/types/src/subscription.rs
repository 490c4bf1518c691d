//! Subscription filters, handles, and poll results

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::anomaly::{AnomalyRecord, InsightItem};
use crate::ids::{ConsumerId, EntityId};
use crate::snapshot::DerivedSnapshot;

/// Which entities a consumer wants updates for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityFilter {
    /// Every entity in the system.
    All,
    /// Only the listed entities.
    Entities(HashSet<EntityId>),
}

impl EntityFilter {
    /// Filter down to a single entity.
    pub fn single(entity_id: EntityId) -> Self {
        Self::Entities(HashSet::from([entity_id]))
    }

    pub fn matches(&self, entity_id: &EntityId) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Entities(set) => set.contains(entity_id),
        }
    }
}

/// Opaque handle identifying a broker subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle(ConsumerId);

impl SubscriptionHandle {
    pub fn new(consumer_id: ConsumerId) -> Self {
        Self(consumer_id)
    }

    pub fn consumer_id(&self) -> ConsumerId {
        self.0
    }
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that changed for a subscriber since its last poll.
///
/// Snapshots are coalesced: at most the latest snapshot per entity,
/// since snapshots are full replacements, not deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollUpdate {
    pub snapshots: Vec<DerivedSnapshot>,
    pub anomalies: Vec<AnomalyRecord>,
    pub insights: Vec<InsightItem>,
}

impl PollUpdate {
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.anomalies.is_empty() && self.insights.is_empty()
    }
}
