//! Core domain abstractions and types
//!
//! This module contains the foundational types, traits, constants and error
//! definitions that the engine is built on. It does not depend on any
//! concrete storage backend or RPC transport.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{ContractReadError, IndexerError, IndexerResult, StorageError};
pub use traits::{ContractReader, EntityStore};
pub use types::{normalize_address, to_decimal, BlockInfo, EngineParams, ReserveSnapshot, TokenAmount};
