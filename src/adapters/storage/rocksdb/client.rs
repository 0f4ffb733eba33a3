//! RocksDB client implementation

use crate::config::RocksDBConfig;
use crate::core::{EntityStore, IndexerError, IndexerResult, StorageError};
use crate::domain::models::{Holder, LeaderboardSlot, LiquidityAggregate, Transaction, Transfer};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

/// Column family names
pub struct ColumnFamilies;

impl ColumnFamilies {
    pub const AGGREGATES: &'static str = "aggregates";
    pub const HOLDERS: &'static str = "holders";
    pub const TRANSACTIONS: &'static str = "transactions";
    pub const TRANSFERS: &'static str = "transfers";
    pub const LEADERBOARD: &'static str = "leaderboard";

    pub const ALL: [&'static str; 5] = [
        Self::AGGREGATES,
        Self::HOLDERS,
        Self::TRANSACTIONS,
        Self::TRANSFERS,
        Self::LEADERBOARD,
    ];
}

/// Durable entity store, one column family per entity kind.
///
/// Values are JSON so decimal fields keep their exact string form.
pub struct RocksDBStore {
    db: DB,
}

impl RocksDBStore {
    /// Open RocksDB with the specified configuration
    pub async fn open(config: &RocksDBConfig) -> IndexerResult<Self> {
        let path = &config.path;

        // Create directory if it doesn't exist
        if !path.exists() {
            std::fs::create_dir_all(path)
                .map_err(|e| IndexerError::Storage(StorageError::RocksDB(e.to_string())))?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(config.max_open_files);
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);

        if config.enable_compression {
            opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        }

        let cfs: Vec<ColumnFamilyDescriptor> = ColumnFamilies::ALL
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_max_write_buffer_number(config.max_write_buffer_number);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        info!("RocksDB opened successfully at: {:?}", path);

        Ok(Self { db })
    }

    /// Put a value into a column family
    pub fn put<V>(&self, cf_name: &str, key: &[u8], value: &V) -> IndexerResult<()>
    where
        V: Serialize,
    {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| StorageError::MissingColumnFamily(cf_name.to_string()))?;

        let serialized = serde_json::to_vec(value)?;
        self.db.put_cf(&cf, key, serialized)?;

        debug!("Put key in CF {}: {} bytes", cf_name, key.len());
        Ok(())
    }

    /// Get a value from a column family
    pub fn get<V>(&self, cf_name: &str, key: &[u8]) -> IndexerResult<Option<V>>
    where
        V: DeserializeOwned,
    {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| StorageError::MissingColumnFamily(cf_name.to_string()))?;

        match self.db.get_cf(&cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EntityStore for RocksDBStore {
    async fn load_aggregate(&self, id: &str) -> IndexerResult<Option<LiquidityAggregate>> {
        self.get(ColumnFamilies::AGGREGATES, id.as_bytes())
    }

    async fn save_aggregate(&self, aggregate: &LiquidityAggregate) -> IndexerResult<()> {
        self.put(ColumnFamilies::AGGREGATES, aggregate.id.as_bytes(), aggregate)
    }

    async fn load_holder(&self, address: &str) -> IndexerResult<Option<Holder>> {
        self.get(ColumnFamilies::HOLDERS, address.as_bytes())
    }

    async fn save_holder(&self, holder: &Holder) -> IndexerResult<()> {
        self.put(ColumnFamilies::HOLDERS, holder.id.as_bytes(), holder)
    }

    async fn load_transaction(&self, id: &str) -> IndexerResult<Option<Transaction>> {
        self.get(ColumnFamilies::TRANSACTIONS, id.as_bytes())
    }

    async fn save_transaction(&self, transaction: &Transaction) -> IndexerResult<()> {
        self.put(ColumnFamilies::TRANSACTIONS, transaction.id.as_bytes(), transaction)
    }

    async fn load_transfer(&self, id: &str) -> IndexerResult<Option<Transfer>> {
        self.get(ColumnFamilies::TRANSFERS, id.as_bytes())
    }

    async fn save_transfer(&self, transfer: &Transfer) -> IndexerResult<()> {
        self.put(ColumnFamilies::TRANSFERS, transfer.id.as_bytes(), transfer)
    }

    async fn load_slot(&self, rank: u8) -> IndexerResult<Option<LeaderboardSlot>> {
        self.get(ColumnFamilies::LEADERBOARD, &[rank])
    }

    async fn save_slot(&self, slot: &LeaderboardSlot) -> IndexerResult<()> {
        self.put(ColumnFamilies::LEADERBOARD, &[slot.rank], slot)
    }

    /// Check the database can still answer a property query
    async fn health_check(&self) -> IndexerResult<()> {
        self.db.property_value("rocksdb.stats")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{GENESIS_BLOCK, LIQUID_CONTRACT_ADDRESS};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> RocksDBConfig {
        RocksDBConfig {
            path: temp_dir.path().to_path_buf(),
            enable_compression: false,
            max_open_files: 100,
            write_buffer_size_mb: 16,
            max_write_buffer_number: 2,
        }
    }

    #[tokio::test]
    async fn test_rocksdb_entity_round_trip() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let store = RocksDBStore::open(&test_config(&temp_dir)).await?;

        let mut aggregate = LiquidityAggregate::new(LIQUID_CONTRACT_ADDRESS, GENESIS_BLOCK);
        aggregate.floor_price = BigDecimal::from_str("0.000123456789012345678901234567890")?;
        store.save_aggregate(&aggregate).await?;

        let loaded = store.load_aggregate(LIQUID_CONTRACT_ADDRESS).await?.unwrap();
        assert_eq!(loaded, aggregate);

        store
            .save_slot(&LeaderboardSlot::new(10, "0xaa", LIQUID_CONTRACT_ADDRESS, 5))
            .await?;
        assert_eq!(store.load_slot(10).await?.unwrap().holder, "0xaa");
        assert!(store.load_slot(1).await?.is_none());

        assert!(store.health_check().await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = test_config(&temp_dir);

        {
            let store = RocksDBStore::open(&config).await?;
            let mut holder = Holder::new("0xaa", LIQUID_CONTRACT_ADDRESS);
            holder.balance = 170_141_183_460_469_231_731_687_303_715_884_105_727;
            store.save_holder(&holder).await?;
        }

        let store = RocksDBStore::open(&config).await?;
        let holder = store.load_holder("0xaa").await?.unwrap();
        assert_eq!(holder.balance, i128::MAX);
        Ok(())
    }
}
