//! Domain models for Liquid token entities
//!
//! These models represent the entities the engine derives from on-chain
//! events. They are independent of storage implementation and contain only
//! domain logic and data.

pub mod aggregate;
pub mod event;
pub mod holder;
pub mod leaderboard;
pub mod transaction;
pub mod transfer;

// Re-export all models
pub use aggregate::*;
pub use event::*;
pub use holder::*;
pub use leaderboard::*;
pub use transaction::*;
pub use transfer::*;
