#![allow(dead_code)]

use liquid_indexer::adapters::{MemoryStore, StaticContractReader};
use liquid_indexer::core::constants::GENESIS_BLOCK;
use liquid_indexer::core::{BlockInfo, ReserveSnapshot};
use liquid_indexer::domain::models::{LiquidEvent, TradeEvent, TransferEvent};
use liquid_indexer::{IndexerConfig, ServiceContainer};
use std::sync::Arc;

pub fn snapshot() -> ReserveSnapshot {
    ReserveSnapshot {
        total_supply: 2_000_000,
        eth_reserve: 1_500_000,
        token_reserve: 1_500_000,
        initial_eth_reserve: 1_000_000,
        initial_token_reserve: 2_000_000,
    }
}

pub fn memory_container() -> anyhow::Result<(ServiceContainer, Arc<MemoryStore>, Arc<StaticContractReader>)> {
    let storage = Arc::new(MemoryStore::new());
    let reader = Arc::new(StaticContractReader::new(snapshot()));
    let container = ServiceContainer::with_components(IndexerConfig::default(), storage.clone(), reader.clone())?;
    Ok((container, storage, reader))
}

pub fn block(offset: u64) -> BlockInfo {
    BlockInfo::new(GENESIS_BLOCK + offset, 1_610_000_000 + offset as i64 * 13)
}

pub fn buy(id: &str, user: &str, eth: u128, tokens: u128, offset: u64) -> LiquidEvent {
    LiquidEvent::Buy(TradeEvent {
        event_id: id.to_string(),
        user: user.to_string(),
        eth_amt: eth,
        token_amt: tokens,
        block: block(offset),
    })
}

pub fn sell(id: &str, user: &str, eth: u128, tokens: u128, offset: u64) -> LiquidEvent {
    LiquidEvent::Sell(TradeEvent {
        event_id: id.to_string(),
        user: user.to_string(),
        eth_amt: eth,
        token_amt: tokens,
        block: block(offset),
    })
}

pub fn transfer(id: &str, from: &str, to: &str, value: u128, offset: u64) -> LiquidEvent {
    LiquidEvent::Transfer(TransferEvent {
        event_id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value,
        block: block(offset),
    })
}
