//! Static contract reader
//!
//! Serves a fixed reserve snapshot instead of querying a node. Tests and
//! offline replays swap the snapshot between events to mimic chain state.

use crate::core::{ContractReader, IndexerResult, ReserveSnapshot, TokenAmount};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub struct StaticContractReader {
    snapshot: RwLock<ReserveSnapshot>,
    last_read_block: RwLock<Option<u64>>,
}

impl StaticContractReader {
    pub fn new(snapshot: ReserveSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            last_read_block: RwLock::new(None),
        }
    }

    pub async fn set_snapshot(&self, snapshot: ReserveSnapshot) {
        *self.snapshot.write().await = snapshot;
    }

    /// Block of the most recent read, if any
    pub async fn last_read_block(&self) -> Option<u64> {
        *self.last_read_block.read().await
    }

    async fn read(&self, block: u64) -> ReserveSnapshot {
        *self.last_read_block.write().await = Some(block);
        *self.snapshot.read().await
    }
}

#[async_trait]
impl ContractReader for StaticContractReader {
    async fn total_supply(&self, block: u64) -> IndexerResult<TokenAmount> {
        Ok(self.read(block).await.total_supply)
    }

    async fn eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        Ok(self.read(block).await.eth_reserve)
    }

    async fn token_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        Ok(self.read(block).await.token_reserve)
    }

    async fn initial_eth_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        Ok(self.read(block).await.initial_eth_reserve)
    }

    async fn initial_token_reserve(&self, block: u64) -> IndexerResult<TokenAmount> {
        Ok(self.read(block).await.initial_token_reserve)
    }
}
