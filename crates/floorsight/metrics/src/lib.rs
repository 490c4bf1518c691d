//! # Floorsight Metrics
//!
//! The derived-metric engine: turns rolling-window state into
//! per-entity [`DerivedSnapshot`]s once per tick. All computation
//! here is pure and total, defined for every valid input including
//! empty windows, which surface as an insufficient-data status rather
//! than an error. Recomputing twice against the same snapshot yields
//! identical results.
//!
//! [`DerivedSnapshot`]: floorsight_types::DerivedSnapshot

pub mod config;
pub mod engine;
pub mod oee;
pub mod pareto;
pub mod spc;

pub use config::{MetricsConfig, OeeSourcesConfig, RiskConfig, SpcConfig, SpcLimits};
pub use engine::DerivedMetricEngine;
pub use oee::{moving_average, project_completion, project_oee};
pub use pareto::{DefectLedger, DowntimeLedger, ParetoEntry};
pub use spc::evaluate_spc;
