//! Ranked insight projection
//!
//! A read-only view over active anomaly records: unacknowledged
//! before acknowledged, severity descending, most recent first-seen
//! breaking ties, truncated to top-K. Identical inputs always produce
//! the identical list.

use floorsight_types::{AnomalyCategory, AnomalyRecord, InsightItem};

/// Build the bounded insight list from active records.
pub fn build_insights(active: &[AnomalyRecord], top_k: usize) -> Vec<InsightItem> {
    let mut records: Vec<&AnomalyRecord> = active.iter().filter(|r| r.active).collect();
    records.sort_by(|a, b| {
        a.acknowledged
            .cmp(&b.acknowledged)
            .then_with(|| {
                b.severity
                    .partial_cmp(&a.severity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| b.first_seen_tick.cmp(&a.first_seen_tick))
    });

    records
        .into_iter()
        .take(top_k)
        .map(|record| InsightItem {
            entity_id: record.entity_id.clone(),
            category: record.category,
            severity: record.severity,
            headline: headline(record),
            advice: advice(record),
        })
        .collect()
}

fn headline(record: &AnomalyRecord) -> String {
    match record.category {
        AnomalyCategory::SpcViolation => {
            format!("SPC out of spec on {}", record.entity_id)
        }
        AnomalyCategory::MetricOutOfBounds => {
            format!("Condition signal outside limits on {}", record.entity_id)
        }
        AnomalyCategory::MachineAlarm => {
            format!("Machine alarm active on {}", record.entity_id)
        }
        AnomalyCategory::ThroughputShortfall => {
            format!("Throughput behind target on {}", record.entity_id)
        }
    }
}

fn advice(record: &AnomalyRecord) -> String {
    let base = match record.category {
        AnomalyCategory::SpcViolation => "Review the control chart and offset tooling.",
        AnomalyCategory::MetricOutOfBounds => {
            "Inspect the sensor and schedule a condition check."
        }
        AnomalyCategory::MachineAlarm => {
            "Dispatch maintenance to investigate the alarm state."
        }
        AnomalyCategory::ThroughputShortfall => {
            "Eliminate micro-stops to recover line velocity."
        }
    };
    if record.severity > 50.0 {
        format!("{base} Containment advised: quarantine output produced since first detection.")
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorsight_types::EntityId;

    fn record(severity: f64, first_seen_tick: u64, acknowledged: bool) -> AnomalyRecord {
        let mut r = AnomalyRecord::new(
            EntityId::new("M-101"),
            AnomalyCategory::SpcViolation,
            severity,
            first_seen_tick,
        );
        r.acknowledged = acknowledged;
        r
    }

    #[test]
    fn ranked_by_severity_desc() {
        let records = vec![record(40.0, 1, false), record(90.0, 1, false)];
        let insights = build_insights(&records, 5);
        assert_eq!(insights[0].severity, 90.0);
        assert_eq!(insights[1].severity, 40.0);
    }

    #[test]
    fn tie_broken_by_most_recent_first_seen() {
        let older = AnomalyRecord::new(
            EntityId::new("M-OLD"),
            AnomalyCategory::SpcViolation,
            70.0,
            2,
        );
        let newer = AnomalyRecord::new(
            EntityId::new("M-NEW"),
            AnomalyCategory::SpcViolation,
            70.0,
            9,
        );
        let insights = build_insights(&[older, newer], 5);
        assert_eq!(insights[0].entity_id, EntityId::new("M-NEW"));
        assert_eq!(insights[1].entity_id, EntityId::new("M-OLD"));
    }

    #[test]
    fn acknowledged_records_demoted() {
        let records = vec![record(95.0, 1, true), record(30.0, 1, false)];
        let insights = build_insights(&records, 5);
        assert_eq!(insights[0].severity, 30.0);
        assert_eq!(insights[1].severity, 95.0);
    }

    #[test]
    fn list_is_bounded_to_top_k() {
        let records: Vec<AnomalyRecord> =
            (0..10).map(|i| record(i as f64 * 10.0, i, false)).collect();
        let insights = build_insights(&records, 5);
        assert_eq!(insights.len(), 5);
        assert_eq!(insights[0].severity, 90.0);
    }

    #[test]
    fn retired_records_excluded() {
        let mut retired = record(80.0, 1, false);
        retired.active = false;
        let insights = build_insights(&[retired], 5);
        assert!(insights.is_empty());
    }

    #[test]
    fn high_severity_advice_includes_containment() {
        let insights = build_insights(&[record(80.0, 1, false)], 5);
        assert!(insights[0].advice.contains("Containment advised"));
        let insights = build_insights(&[record(30.0, 1, false)], 5);
        assert!(!insights[0].advice.contains("Containment advised"));
    }
}
