//! Telemetry events entering the pipeline
//!
//! An [`EventRecord`] is immutable once ingested. The payload variant
//! is the event kind: a numeric sensor reading, a machine state
//! change, or an operator action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AnomalyId, EntityId, MetricName};

/// Discriminant of an event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Numeric sensor reading for a metric series.
    SensorReading,
    /// Machine state transition (run/idle/setup/alarm).
    StateChange,
    /// Manual operator action (acknowledge, downtime log).
    OperatorAction,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SensorReading => write!(f, "sensor_reading"),
            Self::StateChange => write!(f, "state_change"),
            Self::OperatorAction => write!(f, "operator_action"),
        }
    }
}

/// Engineering unit of a sensor reading.
///
/// Each unit carries declared bounds used by ingest validation; a
/// reading outside its unit's physical range is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Percentage, 0..=100.
    Percent,
    /// Temperature in degrees Celsius.
    Celsius,
    /// Vibration velocity in mm/s.
    MmPerSec,
    /// Dimensional measurement in millimetres.
    Mm,
    /// Dimensionless count (pieces, cycles).
    Count,
}

impl Unit {
    /// Declared physical bounds for readings in this unit.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Unit::Percent => (0.0, 100.0),
            Unit::Celsius => (-40.0, 200.0),
            Unit::MmPerSec => (0.0, 50.0),
            Unit::Mm => (0.0, 1000.0),
            Unit::Count => (0.0, f64::MAX),
        }
    }
}

/// Operational state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineState {
    /// Producing parts.
    Run,
    /// Powered but not producing.
    Idle,
    /// Changeover or job setup.
    Setup,
    /// Fault condition, production halted.
    Alarm,
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Run => write!(f, "RUN"),
            Self::Idle => write!(f, "IDLE"),
            Self::Setup => write!(f, "SETUP"),
            Self::Alarm => write!(f, "ALARM"),
        }
    }
}

/// Reason attached to an operator downtime log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DowntimeReason {
    Jam,
    Tool,
    Material,
    NoOperator,
    Other,
}

impl std::fmt::Display for DowntimeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jam => write!(f, "Jam"),
            Self::Tool => write!(f, "Tool"),
            Self::Material => write!(f, "Material"),
            Self::NoOperator => write!(f, "No Operator"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Defect classification for quality counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectCategory {
    Scratch,
    DimensionalError,
    Surface,
    Crack,
}

impl std::fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scratch => write!(f, "Scratch"),
            Self::DimensionalError => write!(f, "Dim. Error"),
            Self::Surface => write!(f, "Surface"),
            Self::Crack => write!(f, "Crack"),
        }
    }
}

/// Manual action taken by an operator at a terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperatorAction {
    /// Acknowledge an active anomaly; the record stays active but is
    /// demoted in insight ranking.
    AcknowledgeAnomaly { anomaly_id: AnomalyId },
    /// Log a downtime occurrence against the entity.
    LogDowntime { reason: DowntimeReason },
    /// Log an inspected defect against the entity.
    LogDefect { category: DefectCategory },
}

/// Typed payload of a telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// A numeric sample for a metric series.
    Reading {
        metric: MetricName,
        value: f64,
        unit: Unit,
    },
    /// The machine entered a new operational state.
    State { state: MachineState },
    /// An operator action.
    Operator { action: OperatorAction },
}

/// A single telemetry event from a machine, sensor, or operator.
///
/// Immutable once ingested; retained only inside the rolling windows
/// of the metric store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Entity that produced the event.
    pub source_id: EntityId,

    /// Typed payload; its variant is the event kind.
    pub payload: EventPayload,

    /// Monotonic timestamp in milliseconds, supplied by the source.
    pub occurred_at_ms: u64,

    /// Wall-clock timestamp for display and audit.
    pub wall_clock: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(source_id: EntityId, payload: EventPayload, occurred_at_ms: u64) -> Self {
        Self {
            source_id,
            payload,
            occurred_at_ms,
            wall_clock: Utc::now(),
        }
    }

    /// Convenience constructor for a sensor reading.
    pub fn reading(
        source_id: EntityId,
        metric: MetricName,
        value: f64,
        unit: Unit,
        occurred_at_ms: u64,
    ) -> Self {
        Self::new(
            source_id,
            EventPayload::Reading {
                metric,
                value,
                unit,
            },
            occurred_at_ms,
        )
    }

    /// Convenience constructor for a state change.
    pub fn state_change(source_id: EntityId, state: MachineState, occurred_at_ms: u64) -> Self {
        Self::new(source_id, EventPayload::State { state }, occurred_at_ms)
    }

    /// Convenience constructor for an operator action.
    pub fn operator(source_id: EntityId, action: OperatorAction, occurred_at_ms: u64) -> Self {
        Self::new(source_id, EventPayload::Operator { action }, occurred_at_ms)
    }

    /// The event kind, derived from the payload variant.
    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::Reading { .. } => EventKind::SensorReading,
            EventPayload::State { .. } => EventKind::StateChange,
            EventPayload::Operator { .. } => EventKind::OperatorAction,
        }
    }
}
