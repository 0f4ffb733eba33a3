//! Token transfer records

use crate::core::{BlockInfo, TokenAmount};
use serde::{Deserialize, Serialize};

/// Write-once record of a transfer, keyed by the source event id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: TokenAmount,
    pub block_number: u64,
    pub timestamp: i64,
    pub aggregate: String,
}

impl Transfer {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: TokenAmount,
        block: &BlockInfo,
        aggregate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            amount,
            block_number: block.number,
            timestamp: block.timestamp,
            aggregate: aggregate.into(),
        }
    }
}
