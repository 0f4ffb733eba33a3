//! Core domain types

use super::constants;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Signed token or wei quantity
pub type TokenAmount = i128;

/// Block context delivered with every event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: i64,
}

impl BlockInfo {
    pub fn new(number: u64, timestamp: i64) -> Self {
        Self { number, timestamp }
    }

    /// Block time as UTC, `None` if the timestamp is out of range
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Point-in-time view of the contract's supply and reserves
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub total_supply: TokenAmount,
    pub eth_reserve: TokenAmount,
    pub token_reserve: TokenAmount,
    pub initial_eth_reserve: TokenAmount,
    pub initial_token_reserve: TokenAmount,
}

/// Parameters the state engine runs with
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub contract_address: String,
    pub excluded_accounts: HashSet<String>,
    pub leaderboard_refresh_interval: u64,
    pub point_rate: BigDecimal,
    pub sell_fee_rate: BigDecimal,
    pub genesis_block: u64,
}

impl EngineParams {
    /// Buys and sells from these accounts are ignored
    pub fn is_excluded(&self, address: &str) -> bool {
        self.excluded_accounts.contains(address)
    }

    pub fn with_excluded(mut self, address: &str) -> Self {
        self.excluded_accounts.insert(normalize_address(address));
        self
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            contract_address: constants::LIQUID_CONTRACT_ADDRESS.to_string(),
            excluded_accounts: HashSet::from([constants::ZERO_ADDRESS.to_string()]),
            leaderboard_refresh_interval: constants::LEADERBOARD_REFRESH_INTERVAL,
            point_rate: constants::point_rate(),
            sell_fee_rate: constants::sell_fee_rate(),
            genesis_block: constants::GENESIS_BLOCK,
        }
    }
}

/// Canonical form used for every address-keyed id
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// Exact decimal view of a token amount
pub fn to_decimal(amount: TokenAmount) -> BigDecimal {
    BigDecimal::from(amount)
}

/// Serde helper carrying `u128` amounts as decimal strings
pub mod amount_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(de::Error::custom)
    }
}
