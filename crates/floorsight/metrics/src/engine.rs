//! The derived-metric engine
//!
//! `recompute` is pure: it reads a store snapshot and the current
//! active-anomaly count and produces a fresh [`DerivedSnapshot`]
//! without advancing any state machine. That purity is what makes
//! recomputation idempotent within a tick.

use floorsight_store::StoreSnapshot;
use floorsight_types::{DerivedSnapshot, EntityId, SpcStatus};

use crate::config::MetricsConfig;
use crate::oee::compute_oee;
use crate::spc::evaluate_spc;

/// Computes per-entity derived snapshots from rolling-window state.
pub struct DerivedMetricEngine {
    config: MetricsConfig,
}

impl DerivedMetricEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Derive the complete snapshot for one entity.
    ///
    /// `active_anomalies` is the entity's current active record count;
    /// risk is base + count x weight, clamped to [0, 100].
    pub fn recompute(
        &self,
        snapshot: &StoreSnapshot,
        entity_id: &EntityId,
        active_anomalies: usize,
        tick: u64,
    ) -> DerivedSnapshot {
        let oee = compute_oee(snapshot, entity_id, &self.config.oee);
        let spc_status = self.spc_status(snapshot, entity_id);
        let risk = self.risk_score(active_anomalies);

        tracing::trace!(
            entity = %entity_id,
            oee = oee.oee,
            spc = %spc_status,
            risk,
            tick,
            "snapshot recomputed"
        );

        DerivedSnapshot::new(entity_id.clone(), oee, spc_status, risk, tick)
    }

    /// SPC status of the entity's watch metric.
    pub fn spc_status(&self, snapshot: &StoreSnapshot, entity_id: &EntityId) -> SpcStatus {
        let spc = &self.config.spc;
        let window = snapshot.window(entity_id, &spc.watch_metric, usize::MAX);
        evaluate_spc(window, spc.limits_for(&spc.watch_metric), spc)
    }

    /// Deterministic risk from the active anomaly set alone.
    pub fn risk_score(&self, active_anomalies: usize) -> f64 {
        let risk = &self.config.risk;
        (risk.base_risk + active_anomalies as f64 * risk.per_anomaly_weight).clamp(0.0, 100.0)
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }
}
