//! Configuration management for the Liquid indexer

use crate::core::constants;
use crate::core::{normalize_address, EngineParams, IndexerError, IndexerResult};
use anyhow::Result;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct IndexerConfig {
    #[validate]
    pub contract: ContractConfig,
    #[validate]
    pub engine: EngineSettings,
    #[validate]
    pub rpc: RpcConfig,
    #[validate]
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
}

/// Addresses the engine keys on or filters out
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContractConfig {
    #[validate(custom = "validate_address")]
    pub address: String,
    #[validate(custom = "validate_address")]
    pub zero_address: String,
    /// Factory account whose buys and sells are ignored
    #[validate(custom = "validate_address")]
    pub factory_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineSettings {
    #[validate(range(min = 1, max = 1_000_000))]
    pub leaderboard_refresh_interval: u64,
    /// Points per token per block, as a decimal string
    #[validate(custom = "validate_decimal")]
    pub point_rate: String,
    #[validate(custom = "validate_decimal")]
    pub sell_fee_rate: String,
    pub genesis_block: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RpcConfig {
    #[validate(url)]
    pub endpoint: String,
    /// Read contract state at each event's block; needs an archive node
    /// for historical replays
    pub pin_to_event_block: bool,
    /// Block tag sent when `pin_to_event_block` is off
    pub block_tag: String,
    #[validate(range(min = 1, max = 120))]
    pub connect_timeout_secs: u64,
    #[validate(range(min = 1, max = 300))]
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    RocksDB,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[validate]
    pub rocksdb: RocksDBConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RocksDBConfig {
    pub path: PathBuf,
    pub enable_compression: bool,
    #[validate(range(min = 100, max = 10000))]
    pub max_open_files: i32,
    #[validate(range(min = 16, max = 2048))]
    pub write_buffer_size_mb: usize,
    #[validate(range(min = 2, max = 16))]
    pub max_write_buffer_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: constants::LIQUID_CONTRACT_ADDRESS.to_string(),
            zero_address: constants::ZERO_ADDRESS.to_string(),
            factory_address: None,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            leaderboard_refresh_interval: constants::LEADERBOARD_REFRESH_INTERVAL,
            point_rate: constants::point_rate().to_string(),
            sell_fee_rate: constants::sell_fee_rate().to_string(),
            genesis_block: constants::GENESIS_BLOCK,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            pin_to_event_block: true,
            block_tag: "latest".to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::RocksDB,
            rocksdb: RocksDBConfig::default(),
        }
    }
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            path: "./data/rocksdb".into(),
            enable_compression: true,
            max_open_files: 1000,
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

fn validate_address(address: &str) -> Result<(), ValidationError> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::new("address_prefix"))?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("address_format"));
    }
    Ok(())
}

fn validate_decimal(value: &str) -> Result<(), ValidationError> {
    BigDecimal::from_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("decimal"))
}

impl IndexerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Ensure required directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::RocksDB {
            std::fs::create_dir_all(&self.storage.rocksdb.path)?;
        }
        Ok(())
    }

    /// Engine parameters with addresses normalized and rates parsed
    pub fn engine_params(&self) -> IndexerResult<EngineParams> {
        let parse = |name: &str, value: &str| {
            BigDecimal::from_str(value)
                .map_err(|e| IndexerError::Configuration(format!("{} '{}': {}", name, value, e)))
        };

        let mut excluded_accounts = HashSet::from([normalize_address(&self.contract.zero_address)]);
        if let Some(factory) = &self.contract.factory_address {
            excluded_accounts.insert(normalize_address(factory));
        }

        Ok(EngineParams {
            contract_address: normalize_address(&self.contract.address),
            excluded_accounts,
            leaderboard_refresh_interval: self.engine.leaderboard_refresh_interval,
            point_rate: parse("point_rate", &self.engine.point_rate)?,
            sell_fee_rate: parse("sell_fee_rate", &self.engine.sell_fee_rate)?,
            genesis_block: self.engine.genesis_block,
        })
    }
}
