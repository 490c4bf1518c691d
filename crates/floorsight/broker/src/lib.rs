//! # Floorsight Broker
//!
//! Fan-out of derived snapshots, anomaly updates, and insights to N
//! independent dashboard consumers. Each subscription owns a cursor
//! into the shared publication sequence, so a slow consumer simply
//! resumes where it left off and never slows ingestion or other
//! consumers. Snapshots are coalesced per entity: they are full
//! replacements, so only the latest since the cursor is delivered.

pub mod broker;
pub mod config;
pub mod error;

pub use broker::SubscriptionBroker;
pub use config::BrokerConfig;
pub use error::{BrokerError, BrokerResult};
