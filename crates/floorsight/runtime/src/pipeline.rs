//! The per-tick pipeline
//!
//! One tick runs, in order: drain operator actions, evaluate anomaly
//! rules against a snapshot taken at tick start, recompute derived
//! snapshots (so risk reflects the just-updated anomaly set), publish
//! to the broker, reap idle subscribers. Everything reads the tick
//! snapshot; nothing blocks ingestion.

use std::sync::Arc;

use floorsight_anomaly::{evaluate_rules, AnomalyGenerator};
use floorsight_broker::SubscriptionBroker;
use floorsight_ingest::EventIngestor;
use floorsight_metrics::{DefectLedger, DerivedMetricEngine, DowntimeLedger, ParetoEntry};
use floorsight_store::MetricStore;
use floorsight_types::{EntityId, InsightItem, OperatorAction};

/// Counters describing one completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub tick: u64,
    pub entities: usize,
    pub anomalies_changed: usize,
    pub actions_applied: usize,
    pub subscribers_reaped: usize,
}

/// Owns the mutable per-tick state and drives one tick at a time.
pub struct TickPipeline {
    store: Arc<MetricStore>,
    ingestor: Arc<EventIngestor>,
    engine: DerivedMetricEngine,
    generator: AnomalyGenerator,
    downtime: DowntimeLedger,
    defects: DefectLedger,
    broker: Arc<SubscriptionBroker>,
    last_insights: Vec<InsightItem>,
    tick: u64,
}

impl TickPipeline {
    pub fn new(
        store: Arc<MetricStore>,
        ingestor: Arc<EventIngestor>,
        engine: DerivedMetricEngine,
        generator: AnomalyGenerator,
        broker: Arc<SubscriptionBroker>,
    ) -> Self {
        Self {
            store,
            ingestor,
            engine,
            generator,
            downtime: DowntimeLedger::new(),
            defects: DefectLedger::new(),
            broker,
            last_insights: Vec::new(),
            tick: 0,
        }
    }

    /// Run one full tick.
    pub fn run_tick(&mut self) -> TickSummary {
        self.tick += 1;
        let tick = self.tick;

        let actions = self.ingestor.drain_actions();
        let actions_applied = actions.len();
        for (entity_id, action) in actions {
            self.apply_action(entity_id, action);
        }

        let snapshot = self.store.snapshot();
        let entities = snapshot.entities();
        let spc = &self.engine.config().spc;

        let mut anomalies_changed = 0;
        for entity_id in &entities {
            let spc_status = self.engine.spc_status(&snapshot, entity_id);
            let limits = spc.limits_for(&spc.watch_metric);
            let reports = evaluate_rules(
                &snapshot,
                entity_id,
                spc_status,
                &spc.watch_metric,
                limits.target,
                limits.tolerance,
                self.generator_config(),
            );
            for record in self.generator.evaluate(entity_id, &reports, tick) {
                self.broker.publish_anomaly(record);
                anomalies_changed += 1;
            }
        }

        // Recompute after evaluation so risk sees the updated set.
        for entity_id in &entities {
            let derived = self.engine.recompute(
                &snapshot,
                entity_id,
                self.generator.active_count(entity_id),
                tick,
            );
            self.broker.publish_snapshot(derived);
        }

        let insights = self.generator.insights();
        if insights != self.last_insights {
            self.broker.publish_insights(insights.clone());
            self.last_insights = insights;
        }

        let subscribers_reaped = self.broker.reap_idle();

        let summary = TickSummary {
            tick,
            entities: entities.len(),
            anomalies_changed,
            actions_applied,
            subscribers_reaped,
        };
        tracing::debug!(
            tick,
            entities = summary.entities,
            anomalies_changed,
            actions_applied,
            "tick completed"
        );
        summary
    }

    fn apply_action(&mut self, entity_id: EntityId, action: OperatorAction) {
        match action {
            OperatorAction::AcknowledgeAnomaly { anomaly_id } => {
                if !self.generator.acknowledge(anomaly_id) {
                    tracing::warn!(id = %anomaly_id, "acknowledgement for unknown anomaly");
                }
            }
            OperatorAction::LogDowntime { reason } => {
                self.downtime.record(entity_id, reason);
            }
            OperatorAction::LogDefect { category } => {
                self.defects.record(entity_id, category);
            }
        }
    }

    fn generator_config(&self) -> &floorsight_anomaly::AnomalyConfig {
        // The generator owns its config; rules read the same one.
        self.generator.config()
    }

    /// Downtime Pareto rows for an entity.
    pub fn downtime_pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.downtime.pareto(entity_id)
    }

    /// Defect Pareto rows for an entity.
    pub fn defect_pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.defects.pareto(entity_id)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }
}
