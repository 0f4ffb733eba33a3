//! Liquidity aggregate tracker

use crate::core::{ContractReader, EntityStore, IndexerResult};
use crate::domain::models::{LiquidityAggregate, LiquidityMetrics};
use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Maintains the contract-wide singleton and its derived metrics
pub struct AggregateTracker<S: EntityStore + ?Sized, R: ContractReader + ?Sized> {
    storage: Arc<S>,
    reader: Arc<R>,
    contract_address: String,
    genesis_block: u64,
    sell_fee_rate: BigDecimal,
}

impl<S: EntityStore + ?Sized, R: ContractReader + ?Sized> AggregateTracker<S, R> {
    pub fn new(
        storage: Arc<S>,
        reader: Arc<R>,
        contract_address: String,
        genesis_block: u64,
        sell_fee_rate: BigDecimal,
    ) -> Self {
        Self {
            storage,
            reader,
            contract_address,
            genesis_block,
            sell_fee_rate,
        }
    }

    /// Load the singleton, or build a fresh one (unsaved) on first use
    pub async fn fetch_or_create_singleton(&self) -> IndexerResult<LiquidityAggregate> {
        if let Some(aggregate) = self.storage.load_aggregate(&self.contract_address).await? {
            return Ok(aggregate);
        }

        info!("Creating liquidity aggregate for {}", self.contract_address);
        Ok(LiquidityAggregate::new(self.contract_address.clone(), self.genesis_block))
    }

    /// Re-read the contract as of `block` and persist the recomputed metrics
    pub async fn recompute_metrics(&self, aggregate: &mut LiquidityAggregate, block: u64) -> IndexerResult<()> {
        let snapshot = self.reader.snapshot(block).await?;
        let metrics = LiquidityMetrics::derive(&snapshot, &self.sell_fee_rate)?;

        debug!(
            "Aggregate metrics: supply={} burned={} price={} floor={}",
            metrics.total_supply, metrics.burned_supply, metrics.price, metrics.floor_price
        );

        aggregate.apply_metrics(metrics);
        self.save(aggregate).await
    }

    pub async fn save(&self, aggregate: &LiquidityAggregate) -> IndexerResult<()> {
        self.storage.save_aggregate(aggregate).await
    }
}
