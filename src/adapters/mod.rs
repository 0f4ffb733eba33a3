//! Adapters layer - Infrastructure implementations
//!
//! This layer contains the infrastructure adapters that implement the port
//! traits defined in the core layer: entity stores, contract readers and
//! event sources.

pub mod ethereum;
pub mod source;
pub mod storage;

// Re-export commonly used adapters
pub use ethereum::{RpcContractReader, StaticContractReader};
pub use source::JsonlEventSource;
pub use storage::{MemoryStore, RocksDBStore};
