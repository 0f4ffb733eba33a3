//! Transaction/transfer recorder
//!
//! Entry point for every tracked event. Records are write-once per event id,
//! so a replayed event is dropped before it can touch balances or points.

use crate::core::{normalize_address, BlockInfo, ContractReader, EngineParams, EntityStore, IndexerResult, TokenAmount};
use crate::domain::models::{Transaction, Transfer};
use crate::domain::processors::{AggregateTracker, HolderLedger, LeaderboardMaintainer};
use std::sync::Arc;
use tracing::debug;

/// What the recorder did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// Event id already recorded
    Duplicate,
    /// Buy/sell from an excluded account
    Excluded,
}

pub struct TransactionRecorder<S: EntityStore + ?Sized, R: ContractReader + ?Sized> {
    storage: Arc<S>,
    params: EngineParams,
    ledger: HolderLedger<S>,
    aggregates: AggregateTracker<S, R>,
    leaderboard: LeaderboardMaintainer<S>,
}

impl<S: EntityStore + ?Sized, R: ContractReader + ?Sized> TransactionRecorder<S, R> {
    pub fn new(storage: Arc<S>, reader: Arc<R>, params: EngineParams) -> Self {
        let ledger = HolderLedger::new(storage.clone(), params.point_rate.clone());
        let aggregates = AggregateTracker::new(
            storage.clone(),
            reader,
            params.contract_address.clone(),
            params.genesis_block,
            params.sell_fee_rate.clone(),
        );
        let leaderboard = LeaderboardMaintainer::new(
            storage.clone(),
            ledger.clone(),
            params.leaderboard_refresh_interval,
        );

        Self {
            storage,
            params,
            ledger,
            aggregates,
            leaderboard,
        }
    }

    /// Record a buy or sell.
    ///
    /// Buys carry a negative ETH delta and a positive token delta; sells the
    /// mirror.
    pub async fn record_buy_or_sell(
        &self,
        event_id: &str,
        account: &str,
        eth_delta: TokenAmount,
        token_delta: TokenAmount,
        block: &BlockInfo,
    ) -> IndexerResult<RecordOutcome> {
        let account = normalize_address(account);
        if self.params.is_excluded(&account) {
            debug!("Skipping trade {} from excluded account {}", event_id, account);
            return Ok(RecordOutcome::Excluded);
        }
        if self.storage.load_transaction(event_id).await?.is_some() {
            debug!("Trade {} already recorded", event_id);
            return Ok(RecordOutcome::Duplicate);
        }

        let mut aggregate = self.aggregates.fetch_or_create_singleton().await?;
        let transaction = Transaction::new(event_id, account.as_str(), eth_delta, token_delta, block, aggregate.id.as_str());
        self.storage.save_transaction(&transaction).await?;
        aggregate.transaction_count += 1;

        let mut holder = self.ledger.fetch_or_create(&account, &mut aggregate).await?;
        self.ledger.accrue_points(&mut holder, block.number);
        holder.apply_trade(event_id, token_delta)?;
        self.ledger.save(&holder).await?;

        self.aggregates.recompute_metrics(&mut aggregate, block.number).await?;

        if self.leaderboard.refresh_due(&aggregate, block.number) {
            self.leaderboard.refresh(&mut aggregate, block.number).await?;
            self.aggregates.save(&aggregate).await?;
        }

        if holder.points > self.leaderboard.minimum_qualifying_points().await? {
            self.leaderboard
                .insert_at_lowest_rank(&holder, &aggregate, block.number)
                .await?;
        }

        debug!(
            "Recorded {:?} {} for {}: eth={} tokens={}",
            transaction.side(),
            event_id,
            account,
            eth_delta,
            token_delta
        );
        Ok(RecordOutcome::Recorded)
    }

    /// Record a transfer. Transfers are not subject to the exclusion list.
    pub async fn record_transfer(
        &self,
        event_id: &str,
        from: &str,
        to: &str,
        amount: TokenAmount,
        block: &BlockInfo,
    ) -> IndexerResult<RecordOutcome> {
        if self.storage.load_transfer(event_id).await?.is_some() {
            debug!("Transfer {} already recorded", event_id);
            return Ok(RecordOutcome::Duplicate);
        }

        let from = normalize_address(from);
        let to = normalize_address(to);

        let mut aggregate = self.aggregates.fetch_or_create_singleton().await?;
        let transfer = Transfer::new(event_id, from.as_str(), to.as_str(), amount, block, aggregate.id.as_str());
        self.storage.save_transfer(&transfer).await?;
        aggregate.transfer_count += 1;

        // Sender is saved before the receiver loads, so a self-transfer nets out
        let mut sender = self.ledger.fetch_or_create(&from, &mut aggregate).await?;
        self.ledger.accrue_points(&mut sender, block.number);
        sender.apply_transfer_out(event_id, amount)?;
        self.ledger.save(&sender).await?;

        let mut receiver = self.ledger.fetch_or_create(&to, &mut aggregate).await?;
        self.ledger.accrue_points(&mut receiver, block.number);
        receiver.apply_transfer_in(event_id, amount)?;
        self.ledger.save(&receiver).await?;

        self.aggregates.recompute_metrics(&mut aggregate, block.number).await?;

        debug!("Recorded transfer {}: {} -> {} amount {}", event_id, from, to, amount);
        Ok(RecordOutcome::Recorded)
    }

    pub fn leaderboard(&self) -> &LeaderboardMaintainer<S> {
        &self.leaderboard
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }
}
