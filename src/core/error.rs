//! Centralized error types for the Liquid indexer

use thiserror::Error;

/// Main indexer error type
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Contract read error: {0}")]
    ContractRead(#[from] ContractReadError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid event {event_id}: {reason}")]
    InvalidEvent { event_id: String, reason: String },

    /// The on-chain state broke an assumption the formulas rely on
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("RocksDB error: {0}")]
    RocksDB(String),

    #[error("Column family not found: {0}")]
    MissingColumnFamily(String),
}

/// Contract reader errors
#[derive(Error, Debug)]
pub enum ContractReadError {
    #[error("Transport error calling {method}: {reason}")]
    Transport { method: String, reason: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed return data for {method}: {reason}")]
    Decode { method: String, reason: String },

    #[error("Value returned by {method} does not fit in 128 bits")]
    Overflow { method: String },
}

/// Result type alias for indexer operations
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Helper to convert rocksdb errors
impl From<rocksdb::Error> for IndexerError {
    fn from(err: rocksdb::Error) -> Self {
        IndexerError::Storage(StorageError::RocksDB(err.to_string()))
    }
}

impl From<serde_json::Error> for IndexerError {
    fn from(err: serde_json::Error) -> Self {
        IndexerError::Serialization(err.to_string())
    }
}
