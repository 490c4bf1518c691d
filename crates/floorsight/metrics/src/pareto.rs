//! Pareto projections for downtime and defect counters
//!
//! Bounded per-entity ledgers fed by operator actions; projections
//! are sorted copies with deterministic ordering (count descending,
//! then label ascending) so identical inputs always render the same.

use std::collections::HashMap;

use floorsight_types::{DefectCategory, DowntimeReason, EntityId};
use serde::{Deserialize, Serialize};

/// One category row of a Pareto projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParetoEntry {
    pub label: String,
    pub count: u64,
}

fn project(counts: &HashMap<String, u64>) -> Vec<ParetoEntry> {
    let mut entries: Vec<ParetoEntry> = counts
        .iter()
        .map(|(label, count)| ParetoEntry {
            label: label.clone(),
            count: *count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

/// Per-entity downtime occurrence counts by reason.
#[derive(Debug, Clone, Default)]
pub struct DowntimeLedger {
    counts: HashMap<EntityId, HashMap<String, u64>>,
}

impl DowntimeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entity_id: EntityId, reason: DowntimeReason) {
        *self
            .counts
            .entry(entity_id)
            .or_default()
            .entry(reason.to_string())
            .or_insert(0) += 1;
    }

    /// Sorted Pareto rows for one entity.
    pub fn pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.counts.get(entity_id).map(project).unwrap_or_default()
    }
}

/// Per-entity defect counts by category.
#[derive(Debug, Clone, Default)]
pub struct DefectLedger {
    counts: HashMap<EntityId, HashMap<String, u64>>,
}

impl DefectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entity_id: EntityId, category: DefectCategory) {
        *self
            .counts
            .entry(entity_id)
            .or_default()
            .entry(category.to_string())
            .or_insert(0) += 1;
    }

    pub fn pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.counts.get(entity_id).map(project).unwrap_or_default()
    }

    /// Total defects logged for an entity.
    pub fn total(&self, entity_id: &EntityId) -> u64 {
        self.counts
            .get(entity_id)
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> EntityId {
        EntityId::new("M-101")
    }

    #[test]
    fn downtime_pareto_sorted_by_count() {
        let mut ledger = DowntimeLedger::new();
        for _ in 0..3 {
            ledger.record(entity(), DowntimeReason::Jam);
        }
        ledger.record(entity(), DowntimeReason::Tool);
        ledger.record(entity(), DowntimeReason::Tool);
        ledger.record(entity(), DowntimeReason::Material);

        let pareto = ledger.pareto(&entity());
        assert_eq!(pareto[0].label, "Jam");
        assert_eq!(pareto[0].count, 3);
        assert_eq!(pareto[1].label, "Tool");
        assert_eq!(pareto[2].label, "Material");
    }

    #[test]
    fn ties_break_alphabetically() {
        let mut ledger = DefectLedger::new();
        ledger.record(entity(), DefectCategory::Surface);
        ledger.record(entity(), DefectCategory::Crack);

        let pareto = ledger.pareto(&entity());
        assert_eq!(pareto[0].label, "Crack");
        assert_eq!(pareto[1].label, "Surface");
    }

    #[test]
    fn entities_are_isolated() {
        let mut ledger = DowntimeLedger::new();
        ledger.record(entity(), DowntimeReason::Jam);
        assert!(ledger.pareto(&EntityId::new("M-102")).is_empty());
    }

    #[test]
    fn defect_total_sums_categories() {
        let mut ledger = DefectLedger::new();
        ledger.record(entity(), DefectCategory::Scratch);
        ledger.record(entity(), DefectCategory::Scratch);
        ledger.record(entity(), DefectCategory::Crack);
        assert_eq!(ledger.total(&entity()), 3);
    }
}
