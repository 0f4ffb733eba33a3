//! In-process entity store

use crate::core::{EntityStore, IndexerResult};
use crate::domain::models::{Holder, LeaderboardSlot, LiquidityAggregate, Transaction, Transfer};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    aggregates: HashMap<String, LiquidityAggregate>,
    holders: HashMap<String, Holder>,
    transactions: HashMap<String, Transaction>,
    transfers: HashMap<String, Transfer>,
    slots: HashMap<u8, LeaderboardSlot>,
}

/// Map-backed store with read-your-writes semantics, for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn holder_count(&self) -> usize {
        self.tables.read().await.holders.len()
    }

    pub async fn transaction_count(&self) -> usize {
        self.tables.read().await.transactions.len()
    }

    pub async fn transfer_count(&self) -> usize {
        self.tables.read().await.transfers.len()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn load_aggregate(&self, id: &str) -> IndexerResult<Option<LiquidityAggregate>> {
        Ok(self.tables.read().await.aggregates.get(id).cloned())
    }

    async fn save_aggregate(&self, aggregate: &LiquidityAggregate) -> IndexerResult<()> {
        self.tables
            .write()
            .await
            .aggregates
            .insert(aggregate.id.clone(), aggregate.clone());
        Ok(())
    }

    async fn load_holder(&self, address: &str) -> IndexerResult<Option<Holder>> {
        Ok(self.tables.read().await.holders.get(address).cloned())
    }

    async fn save_holder(&self, holder: &Holder) -> IndexerResult<()> {
        self.tables.write().await.holders.insert(holder.id.clone(), holder.clone());
        Ok(())
    }

    async fn load_transaction(&self, id: &str) -> IndexerResult<Option<Transaction>> {
        Ok(self.tables.read().await.transactions.get(id).cloned())
    }

    async fn save_transaction(&self, transaction: &Transaction) -> IndexerResult<()> {
        self.tables
            .write()
            .await
            .transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    async fn load_transfer(&self, id: &str) -> IndexerResult<Option<Transfer>> {
        Ok(self.tables.read().await.transfers.get(id).cloned())
    }

    async fn save_transfer(&self, transfer: &Transfer) -> IndexerResult<()> {
        self.tables
            .write()
            .await
            .transfers
            .insert(transfer.id.clone(), transfer.clone());
        Ok(())
    }

    async fn load_slot(&self, rank: u8) -> IndexerResult<Option<LeaderboardSlot>> {
        Ok(self.tables.read().await.slots.get(&rank).cloned())
    }

    async fn save_slot(&self, slot: &LeaderboardSlot) -> IndexerResult<()> {
        self.tables.write().await.slots.insert(slot.rank, slot.clone());
        Ok(())
    }

    async fn health_check(&self) -> IndexerResult<()> {
        Ok(())
    }
}
