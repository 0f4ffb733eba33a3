//! Decoded contract events delivered by the event-sourcing runtime

use crate::core::types::amount_string;
use crate::core::{BlockInfo, IndexerError, IndexerResult, TokenAmount};
use serde::{Deserialize, Serialize};

/// `BuyToken` / `SellToken` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeEvent {
    /// Hash of the emitting transaction
    pub event_id: String,
    pub user: String,
    #[serde(with = "amount_string")]
    pub eth_amt: u128,
    #[serde(with = "amount_string")]
    pub token_amt: u128,
    pub block: BlockInfo,
}

/// ERC-20 `Transfer` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferEvent {
    pub event_id: String,
    pub from: String,
    pub to: String,
    #[serde(with = "amount_string")]
    pub value: u128,
    pub block: BlockInfo,
}

/// Every event kind the engine handles.
///
/// Amounts travel as decimal strings since wei values overflow JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiquidEvent {
    Buy(TradeEvent),
    Sell(TradeEvent),
    Transfer(TransferEvent),
}

impl LiquidEvent {
    pub fn event_id(&self) -> &str {
        match self {
            LiquidEvent::Buy(e) | LiquidEvent::Sell(e) => &e.event_id,
            LiquidEvent::Transfer(e) => &e.event_id,
        }
    }

    pub fn block(&self) -> &BlockInfo {
        match self {
            LiquidEvent::Buy(e) | LiquidEvent::Sell(e) => &e.block,
            LiquidEvent::Transfer(e) => &e.block,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LiquidEvent::Buy(_) => "buy",
            LiquidEvent::Sell(_) => "sell",
            LiquidEvent::Transfer(_) => "transfer",
        }
    }
}

/// Convert an unsigned on-chain amount into the signed domain type
pub fn signed_amount(event_id: &str, value: u128) -> IndexerResult<TokenAmount> {
    TokenAmount::try_from(value).map_err(|_| IndexerError::InvalidEvent {
        event_id: event_id.to_string(),
        reason: format!("amount {} exceeds the signed 128-bit range", value),
    })
}
