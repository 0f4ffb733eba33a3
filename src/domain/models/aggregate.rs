//! Liquidity aggregate domain model and contract-wide metrics

use crate::core::{to_decimal, IndexerError, IndexerResult, ReserveSnapshot, TokenAmount};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Contract-wide singleton, keyed by the contract address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidityAggregate {
    pub id: String,
    pub total_supply: TokenAmount,
    pub burned_supply: TokenAmount,
    pub circulating_supply: TokenAmount,
    pub ether_locked: TokenAmount,
    pub price: BigDecimal,
    pub floor_price: BigDecimal,
    pub last_leaderboard_update_block: u64,

    // Relationship counters
    pub holder_count: u64,
    pub transaction_count: u64,
    pub transfer_count: u64,
}

impl LiquidityAggregate {
    pub fn new(id: impl Into<String>, genesis_block: u64) -> Self {
        Self {
            id: id.into(),
            total_supply: 0,
            burned_supply: 0,
            circulating_supply: 0,
            ether_locked: 0,
            price: BigDecimal::zero(),
            floor_price: BigDecimal::zero(),
            last_leaderboard_update_block: genesis_block,
            holder_count: 0,
            transaction_count: 0,
            transfer_count: 0,
        }
    }

    pub fn apply_metrics(&mut self, metrics: LiquidityMetrics) {
        self.total_supply = metrics.total_supply;
        self.burned_supply = metrics.burned_supply;
        self.circulating_supply = metrics.circulating_supply;
        self.ether_locked = metrics.ether_locked;
        self.price = metrics.price;
        self.floor_price = metrics.floor_price;
    }

    /// Blocks elapsed since the last full leaderboard refresh
    pub fn blocks_since_leaderboard_update(&self, current_block: u64) -> u64 {
        current_block.saturating_sub(self.last_leaderboard_update_block)
    }
}

/// Metrics derived from one contract snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityMetrics {
    pub total_supply: TokenAmount,
    pub burned_supply: TokenAmount,
    pub circulating_supply: TokenAmount,
    pub ether_locked: TokenAmount,
    pub price: BigDecimal,
    pub floor_price: BigDecimal,
}

impl LiquidityMetrics {
    /// Derive supply, price and floor price from reserves.
    ///
    /// Zero reserves are a broken contract invariant and surface as
    /// `IndexerError::Precondition` rather than a division panic.
    pub fn derive(snapshot: &ReserveSnapshot, sell_fee_rate: &BigDecimal) -> IndexerResult<Self> {
        if snapshot.token_reserve == 0 {
            return Err(IndexerError::Precondition("token reserve is zero".to_string()));
        }

        let burned_supply = snapshot.initial_token_reserve - snapshot.total_supply;
        let circulating_supply = snapshot.total_supply - snapshot.token_reserve;
        let ether_locked = snapshot.eth_reserve - snapshot.initial_eth_reserve;
        let price = to_decimal(snapshot.eth_reserve) / to_decimal(snapshot.token_reserve);

        let floor_price = if burned_supply > 0 {
            Self::burn_adjusted_floor(snapshot, circulating_supply, sell_fee_rate)?
        } else {
            if snapshot.initial_token_reserve == 0 {
                return Err(IndexerError::Precondition("initial token reserve is zero".to_string()));
            }
            to_decimal(snapshot.initial_eth_reserve) / to_decimal(snapshot.initial_token_reserve)
        };

        Ok(Self {
            total_supply: snapshot.total_supply,
            burned_supply,
            circulating_supply,
            ether_locked,
            price,
            floor_price,
        })
    }

    /// Floor price once supply has been burned: assume every circulating
    /// token is sold back, burning the sell fee, and that the reserve side
    /// burns proportionally.
    fn burn_adjusted_floor(
        snapshot: &ReserveSnapshot,
        circulating_supply: TokenAmount,
        sell_fee_rate: &BigDecimal,
    ) -> IndexerResult<BigDecimal> {
        let circulating = to_decimal(circulating_supply);
        let potential_burns = &circulating * sell_fee_rate;
        let extra_burns = if circulating_supply == 0 {
            BigDecimal::zero()
        } else {
            to_decimal(snapshot.token_reserve) * &potential_burns / &circulating
        };

        let remaining = to_decimal(snapshot.total_supply) - potential_burns - extra_burns;
        if remaining.is_zero() {
            return Err(IndexerError::Precondition(
                "supply left after potential burns is zero".to_string(),
            ));
        }

        Ok(to_decimal(snapshot.initial_eth_reserve) / remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{sell_fee_rate, GENESIS_BLOCK, LIQUID_CONTRACT_ADDRESS};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_aggregate_starts_at_genesis() {
        let aggregate = LiquidityAggregate::new(LIQUID_CONTRACT_ADDRESS, GENESIS_BLOCK);
        assert_eq!(aggregate.last_leaderboard_update_block, GENESIS_BLOCK);
        assert_eq!(aggregate.blocks_since_leaderboard_update(GENESIS_BLOCK + 7201), 7201);
        assert_eq!(aggregate.blocks_since_leaderboard_update(1), 0);
    }

    #[test]
    fn test_floor_without_burns_uses_initial_ratio() {
        let snapshot = ReserveSnapshot {
            total_supply: 2_000_000,
            eth_reserve: 1_500_000,
            token_reserve: 1_500_000,
            initial_eth_reserve: 1_000_000,
            initial_token_reserve: 2_000_000,
        };

        let metrics = LiquidityMetrics::derive(&snapshot, &sell_fee_rate()).unwrap();

        assert_eq!(metrics.burned_supply, 0);
        assert_eq!(metrics.circulating_supply, 500_000);
        assert_eq!(metrics.ether_locked, 500_000);
        assert_eq!(metrics.price, dec("1"));
        assert_eq!(metrics.floor_price, dec("0.5"));
    }

    #[test]
    fn test_floor_with_burns_applies_fee_model() {
        // circulating 500_000 → potential 3_000, extra 490_000 × 3_000 / 500_000 = 2_940
        // floor = 4_920_300 / (990_000 − 3_000 − 2_940) = 5
        let snapshot = ReserveSnapshot {
            total_supply: 990_000,
            eth_reserve: 9_800_000,
            token_reserve: 490_000,
            initial_eth_reserve: 4_920_300,
            initial_token_reserve: 1_000_000,
        };

        let metrics = LiquidityMetrics::derive(&snapshot, &sell_fee_rate()).unwrap();

        assert_eq!(metrics.burned_supply, 10_000);
        assert_eq!(metrics.circulating_supply, 500_000);
        assert_eq!(metrics.ether_locked, 4_879_700);
        assert_eq!(metrics.price, dec("20"));
        assert_eq!(metrics.floor_price, dec("5"));
    }

    #[test]
    fn test_zero_token_reserve_is_precondition_error() {
        let snapshot = ReserveSnapshot {
            total_supply: 10,
            eth_reserve: 10,
            token_reserve: 0,
            initial_eth_reserve: 1,
            initial_token_reserve: 10,
        };

        let err = LiquidityMetrics::derive(&snapshot, &sell_fee_rate()).unwrap_err();
        assert!(matches!(err, IndexerError::Precondition(_)));
    }

    #[test]
    fn test_apply_metrics_keeps_counters() {
        let mut aggregate = LiquidityAggregate::new(LIQUID_CONTRACT_ADDRESS, GENESIS_BLOCK);
        aggregate.transaction_count = 3;
        let snapshot = ReserveSnapshot {
            total_supply: 2_000_000,
            eth_reserve: 1_500_000,
            token_reserve: 1_500_000,
            initial_eth_reserve: 1_000_000,
            initial_token_reserve: 2_000_000,
        };

        aggregate.apply_metrics(LiquidityMetrics::derive(&snapshot, &sell_fee_rate()).unwrap());

        assert_eq!(aggregate.transaction_count, 3);
        assert_eq!(aggregate.total_supply, 2_000_000);
        assert_eq!(aggregate.floor_price, dec("0.5"));
    }
}
