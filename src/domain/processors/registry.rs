//! Event registry for routing decoded contract events

use crate::core::{ContractReader, EngineParams, EntityStore, IndexerResult};
use crate::domain::models::{signed_amount, LeaderboardSlot, LiquidEvent};
use crate::domain::processors::{RecordOutcome, TransactionRecorder};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Routes each event kind to its handler
pub struct EventRegistry<S: EntityStore + ?Sized, R: ContractReader + ?Sized> {
    recorder: TransactionRecorder<S, R>,
}

impl<S: EntityStore + ?Sized, R: ContractReader + ?Sized> EventRegistry<S, R> {
    /// Create a new event registry
    pub fn new(storage: Arc<S>, reader: Arc<R>, params: EngineParams) -> Self {
        Self {
            recorder: TransactionRecorder::new(storage, reader, params),
        }
    }

    /// Route one event. Callers must deliver events in block order and wait
    /// for each call to finish before sending the next.
    #[instrument(skip_all, fields(kind = event.kind(), id = event.event_id()))]
    pub async fn process(&self, event: &LiquidEvent) -> IndexerResult<RecordOutcome> {
        let outcome = match event {
            LiquidEvent::Buy(buy) => {
                let eth = signed_amount(&buy.event_id, buy.eth_amt)?;
                let tokens = signed_amount(&buy.event_id, buy.token_amt)?;
                self.recorder
                    .record_buy_or_sell(&buy.event_id, &buy.user, -eth, tokens, &buy.block)
                    .await?
            }
            LiquidEvent::Sell(sell) => {
                let eth = signed_amount(&sell.event_id, sell.eth_amt)?;
                let tokens = signed_amount(&sell.event_id, sell.token_amt)?;
                self.recorder
                    .record_buy_or_sell(&sell.event_id, &sell.user, eth, -tokens, &sell.block)
                    .await?
            }
            LiquidEvent::Transfer(transfer) => {
                let value = signed_amount(&transfer.event_id, transfer.value)?;
                self.recorder
                    .record_transfer(&transfer.event_id, &transfer.from, &transfer.to, value, &transfer.block)
                    .await?
            }
        };

        debug!("Event outcome: {:?}", outcome);
        Ok(outcome)
    }

    /// Current leaderboard, populated ranks only
    pub async fn leaderboard(&self) -> IndexerResult<Vec<LeaderboardSlot>> {
        self.recorder.leaderboard().leaderboard().await
    }

    pub fn params(&self) -> &EngineParams {
        self.recorder.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{GENESIS_BLOCK, LIQUID_CONTRACT_ADDRESS};
    use crate::core::BlockInfo;
    use crate::domain::models::{TradeEvent, TransferEvent};
    use crate::domain::processors::test_support::fixtures;

    #[tokio::test]
    async fn test_sign_convention_for_buy_and_sell() -> anyhow::Result<()> {
        let (storage, reader) = fixtures();
        let registry = EventRegistry::new(storage.clone(), reader, EngineParams::default());
        let block = BlockInfo::new(GENESIS_BLOCK + 1, 1_610_000_000);

        registry
            .process(&LiquidEvent::Buy(TradeEvent {
                event_id: "0xb1".to_string(),
                user: "0xAA".to_string(),
                eth_amt: 100,
                token_amt: 1000,
                block,
            }))
            .await?;
        registry
            .process(&LiquidEvent::Sell(TradeEvent {
                event_id: "0x51".to_string(),
                user: "0xAA".to_string(),
                eth_amt: 50,
                token_amt: 400,
                block,
            }))
            .await?;

        let buy = storage.load_transaction("0xb1").await?.unwrap();
        assert_eq!((buy.eth_amount, buy.token_amount), (-100, 1000));
        let sell = storage.load_transaction("0x51").await?.unwrap();
        assert_eq!((sell.eth_amount, sell.token_amount), (50, -400));
        assert_eq!(sell.aggregate, LIQUID_CONTRACT_ADDRESS);
        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_amount_is_rejected() -> anyhow::Result<()> {
        let (storage, reader) = fixtures();
        let registry = EventRegistry::new(storage.clone(), reader, EngineParams::default());

        let result = registry
            .process(&LiquidEvent::Transfer(TransferEvent {
                event_id: "0x7f".to_string(),
                from: "0xaa".to_string(),
                to: "0xbb".to_string(),
                value: u128::MAX,
                block: BlockInfo::new(GENESIS_BLOCK + 1, 0),
            }))
            .await;

        assert!(result.is_err());
        assert!(storage.load_transfer("0x7f").await?.is_none());
        Ok(())
    }
}
