//! Buy/sell transaction records

use crate::core::{BlockInfo, TokenAmount};
use serde::{Deserialize, Serialize};

/// Direction of a trade against the bonding contract
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Write-once record of a buy or sell, keyed by the source event id.
///
/// Amounts are signed from the protocol's point of view: a buy carries a
/// negative ETH amount and a positive token amount, a sell the mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub account: String,
    pub eth_amount: TokenAmount,
    pub token_amount: TokenAmount,
    pub block_number: u64,
    pub timestamp: i64,
    pub aggregate: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        account: impl Into<String>,
        eth_amount: TokenAmount,
        token_amount: TokenAmount,
        block: &BlockInfo,
        aggregate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            eth_amount,
            token_amount,
            block_number: block.number,
            timestamp: block.timestamp,
            aggregate: aggregate.into(),
        }
    }

    pub fn side(&self) -> TradeSide {
        if self.token_amount > 0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        }
    }
}
