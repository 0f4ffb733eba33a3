//! Domain layer - business logic and domain models
//!
//! This layer contains the state-update rules of the indexer, independent of
//! infrastructure concerns like databases or RPC transports.

pub mod models;
pub mod processors;

// Re-export commonly used items
pub use models::*;
