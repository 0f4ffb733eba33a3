//! Storage adapters
//!
//! Backends implementing the `EntityStore` port.

pub mod memory;
pub mod rocksdb;

pub use memory::MemoryStore;
pub use self::rocksdb::{ColumnFamilies, RocksDBStore};
