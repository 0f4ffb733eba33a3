//! Liquid token indexer library
//!
//! Event-driven state engine that turns ordered `BuyToken`, `SellToken` and
//! `Transfer` events into holder balances, proof-of-liquidity points, a
//! top-ten leaderboard and contract-wide price metrics.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use crate::config::IndexerConfig;
pub use crate::core::{EngineParams, IndexerError, IndexerResult};
pub use domain::processors::{EventRegistry, RecordOutcome};
pub use infrastructure::ServiceContainer;
