//! Holder domain model and proof-of-liquidity accrual

use crate::core::{to_decimal, IndexerError, IndexerResult, TokenAmount};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Per-account balance and point state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holder {
    /// Normalized account address
    pub id: String,
    pub balance: TokenAmount,
    pub total_bought: TokenAmount,
    pub total_sold: TokenAmount,
    /// Cumulative amount sent out through plain transfers
    pub total_transferred: TokenAmount,
    pub points: BigDecimal,
    pub last_point_update_block: u64,
    /// Id of the owning liquidity aggregate
    pub aggregate: String,
}

impl Holder {
    /// Zero-initialized holder; never accrued, so it back-dates to block 0
    pub fn new(id: impl Into<String>, aggregate: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: 0,
            total_bought: 0,
            total_sold: 0,
            total_transferred: 0,
            points: BigDecimal::zero(),
            last_point_update_block: 0,
            aggregate: aggregate.into(),
        }
    }

    /// Award `balance × elapsed blocks × rate` and move the accrual cursor.
    ///
    /// Must run before the balance changes so points are earned on what was
    /// actually held over the elapsed blocks. Returns the points earned.
    pub fn accrue_points(&mut self, current_block: u64, rate: &BigDecimal) -> BigDecimal {
        if current_block <= self.last_point_update_block {
            return BigDecimal::zero();
        }

        let elapsed = current_block - self.last_point_update_block;
        let earned = to_decimal(self.balance) * to_decimal(elapsed as TokenAmount) * rate;

        self.points += &earned;
        self.last_point_update_block = current_block;
        earned
    }

    /// Apply a buy (positive delta) or sell (negative delta)
    pub fn apply_trade(&mut self, event_id: &str, token_delta: TokenAmount) -> IndexerResult<()> {
        let balance = checked(event_id, "balance", self.balance.checked_add(token_delta))?;
        if token_delta > 0 {
            self.total_bought = checked(event_id, "total bought", self.total_bought.checked_add(token_delta))?;
        } else {
            let sold = token_delta.checked_neg().and_then(|sold| self.total_sold.checked_add(sold));
            self.total_sold = checked(event_id, "total sold", sold)?;
        }
        self.balance = balance;
        Ok(())
    }

    pub fn apply_transfer_out(&mut self, event_id: &str, amount: TokenAmount) -> IndexerResult<()> {
        let balance = checked(event_id, "balance", self.balance.checked_sub(amount))?;
        self.total_transferred = checked(
            event_id,
            "total transferred",
            self.total_transferred.checked_add(amount),
        )?;
        self.balance = balance;
        Ok(())
    }

    pub fn apply_transfer_in(&mut self, event_id: &str, amount: TokenAmount) -> IndexerResult<()> {
        self.balance = checked(event_id, "balance", self.balance.checked_add(amount))?;
        Ok(())
    }
}

fn checked(event_id: &str, field: &str, value: Option<TokenAmount>) -> IndexerResult<TokenAmount> {
    value.ok_or_else(|| IndexerError::InvalidEvent {
        event_id: event_id.to_string(),
        reason: format!("{} overflows a 128-bit amount", field),
    })
}
