//! Derived per-entity snapshots
//!
//! A [`DerivedSnapshot`] is recomputed from rolling-window state once
//! per tick and replaces the previous snapshot atomically; it is never
//! patched in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Statistical process control status of an entity's tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpcStatus {
    /// The window holds no samples yet; not an error.
    InsufficientData,
    /// Latest sample inside control limits, no drift detected.
    Stable,
    /// Trailing samples drifting monotonically toward a limit.
    Warning,
    /// Latest sample outside the control limits.
    OutOfSpec,
}

impl std::fmt::Display for SpcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData => write!(f, "insufficient_data"),
            Self::Stable => write!(f, "stable"),
            Self::Warning => write!(f, "warning"),
            Self::OutOfSpec => write!(f, "out_of_spec"),
        }
    }
}

/// The three OEE factors and their product, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeComponents {
    /// Availability factor, clamped to [0, 100].
    pub availability: f64,
    /// Performance factor, clamped to [0, 100].
    pub performance: f64,
    /// Quality factor, clamped to [0, 100].
    pub quality: f64,
    /// Overall Equipment Effectiveness: A x P x Q / 10000.
    pub oee: f64,
    /// True when at least one factor window held no samples.
    pub insufficient_data: bool,
}

impl OeeComponents {
    /// Compute OEE from the three factors, clamping each to [0, 100].
    pub fn from_factors(availability: f64, performance: f64, quality: f64) -> Self {
        let a = availability.clamp(0.0, 100.0);
        let p = performance.clamp(0.0, 100.0);
        let q = quality.clamp(0.0, 100.0);
        Self {
            availability: a,
            performance: p,
            quality: q,
            oee: a * p * q / 10_000.0,
            insufficient_data: false,
        }
    }

    /// Placeholder components for an entity with no factor data yet.
    pub fn insufficient() -> Self {
        Self {
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
            insufficient_data: true,
        }
    }
}

/// Consistent per-entity view of all derived metrics at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSnapshot {
    /// Entity this snapshot describes.
    pub entity_id: EntityId,

    /// OEE factors and headline number.
    pub oee: OeeComponents,

    /// SPC status of the entity's control-charted metric.
    pub spc_status: SpcStatus,

    /// Risk score in [0, 100], derived from the active anomaly set.
    pub risk_score: f64,

    /// Tick at which this snapshot was computed.
    pub computed_at_tick: u64,

    /// Publication sequence number assigned by the broker.
    pub seq: u64,

    /// Wall-clock time of computation.
    pub computed_at: DateTime<Utc>,
}

impl DerivedSnapshot {
    pub fn new(
        entity_id: EntityId,
        oee: OeeComponents,
        spc_status: SpcStatus,
        risk_score: f64,
        computed_at_tick: u64,
    ) -> Self {
        Self {
            entity_id,
            oee,
            spc_status,
            risk_score: risk_score.clamp(0.0, 100.0),
            computed_at_tick,
            seq: 0,
            computed_at: Utc::now(),
        }
    }
}
