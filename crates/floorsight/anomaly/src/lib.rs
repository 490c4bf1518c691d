//! # Floorsight Anomaly
//!
//! Turns per-tick rule conditions into ranked, deduplicated anomaly
//! records with bounded retention. Each (entity, category) pair runs
//! a Quiescent -> Active -> Retiring -> Quiescent lifecycle with a
//! cool-down, so a condition flapping across single ticks never
//! produces duplicate records. Insights are a read-only projection
//! over the currently active set.

pub mod config;
pub mod generator;
pub mod insight;
pub mod lifecycle;
pub mod rules;

pub use config::{AlertBounds, AnomalyConfig};
pub use generator::AnomalyGenerator;
pub use lifecycle::Phase;
pub use rules::{evaluate_rules, ConditionReport};
