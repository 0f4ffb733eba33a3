//! Core trait abstractions (Ports in Hexagonal Architecture)

use async_trait::async_trait;

use super::error::IndexerResult;
use super::types::{ReserveSnapshot, TokenAmount};
use crate::domain::models::{Holder, LeaderboardSlot, LiquidityAggregate, Transaction, Transfer};

/// Entity store port: load-by-id and save, nothing else.
///
/// Every save is durable on return and visible to the next load. There are no
/// transactions spanning several saves.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn load_aggregate(&self, id: &str) -> IndexerResult<Option<LiquidityAggregate>>;

    async fn save_aggregate(&self, aggregate: &LiquidityAggregate) -> IndexerResult<()>;

    async fn load_holder(&self, address: &str) -> IndexerResult<Option<Holder>>;

    async fn save_holder(&self, holder: &Holder) -> IndexerResult<()>;

    async fn load_transaction(&self, id: &str) -> IndexerResult<Option<Transaction>>;

    async fn save_transaction(&self, transaction: &Transaction) -> IndexerResult<()>;

    async fn load_transfer(&self, id: &str) -> IndexerResult<Option<Transfer>>;

    async fn save_transfer(&self, transfer: &Transfer) -> IndexerResult<()>;

    async fn load_slot(&self, rank: u8) -> IndexerResult<Option<LeaderboardSlot>>;

    async fn save_slot(&self, slot: &LeaderboardSlot) -> IndexerResult<()>;

    /// Health check
    async fn health_check(&self) -> IndexerResult<()>;
}

/// Read-only view of the token contract as of a given block
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn total_supply(&self, block: u64) -> IndexerResult<TokenAmount>;

    async fn eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount>;

    async fn token_reserve(&self, block: u64) -> IndexerResult<TokenAmount>;

    async fn initial_eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount>;

    async fn initial_token_reserve(&self, block: u64) -> IndexerResult<TokenAmount>;

    /// Read everything the aggregate metrics need at `block` (template method)
    async fn snapshot(&self, block: u64) -> IndexerResult<ReserveSnapshot> {
        Ok(ReserveSnapshot {
            total_supply: self.total_supply(block).await?,
            eth_reserve: self.eth_reserve(block).await?,
            token_reserve: self.token_reserve(block).await?,
            initial_eth_reserve: self.initial_eth_reserve(block).await?,
            initial_token_reserve: self.initial_token_reserve(block).await?,
        })
    }
}
