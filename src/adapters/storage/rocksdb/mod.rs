//! RocksDB-backed entity store

mod client;

pub use client::{ColumnFamilies, RocksDBStore};
