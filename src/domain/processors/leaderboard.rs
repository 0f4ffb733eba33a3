//! Leaderboard maintainer: top holders by accrued points
//!
//! The terminal slot (rank 10) always holds the lowest scorer on the board.
//! A periodic full refresh re-accrues every ranked holder before moving the
//! lowest scorer there, and between refreshes a holder that beats the
//! terminal slot takes a vacant rank or replaces it. The nine upper slots are
//! never re-sorted, so ordering among them is only approximate.

use crate::core::constants::LEADERBOARD_SIZE;
use crate::core::{EntityStore, IndexerResult};
use crate::domain::models::{Holder, LeaderboardSlot, LiquidityAggregate, LOWEST_RANK};
use crate::domain::processors::HolderLedger;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct LeaderboardMaintainer<S: EntityStore + ?Sized> {
    storage: Arc<S>,
    ledger: HolderLedger<S>,
    refresh_interval: u64,
}

impl<S: EntityStore + ?Sized> LeaderboardMaintainer<S> {
    pub fn new(storage: Arc<S>, ledger: HolderLedger<S>, refresh_interval: u64) -> Self {
        Self {
            storage,
            ledger,
            refresh_interval,
        }
    }

    /// Whether more than the refresh interval has elapsed since the last scan
    pub fn refresh_due(&self, aggregate: &LiquidityAggregate, current_block: u64) -> bool {
        aggregate.blocks_since_leaderboard_update(current_block) > self.refresh_interval
    }

    /// Re-accrue every ranked holder, then demote the lowest scorer to the
    /// terminal rank. Stamps the refresh block on `aggregate`; the caller
    /// persists it.
    pub async fn refresh(&self, aggregate: &mut LiquidityAggregate, current_block: u64) -> IndexerResult<()> {
        let mut scored = Vec::with_capacity(LEADERBOARD_SIZE as usize);

        for rank in 1..=LEADERBOARD_SIZE {
            let Some(slot) = self.storage.load_slot(rank).await? else {
                continue;
            };
            let Some(mut holder) = self.storage.load_holder(&slot.holder).await? else {
                warn!("Rank {} points at unknown holder {}", rank, slot.holder);
                continue;
            };

            self.ledger.accrue_points(&mut holder, current_block);
            self.ledger.save(&holder).await?;
            scored.push((rank, holder.points));
        }

        let lowest = lowest_scorer(scored);

        if let Some((min_rank, min_points)) = lowest {
            debug!("Lowest ranked holder sits at rank {} with {} points", min_rank, min_points);
            self.demote_to_lowest_rank(min_rank).await?;
        }

        aggregate.last_leaderboard_update_block = current_block;
        info!("Leaderboard refreshed at block {}", current_block);
        Ok(())
    }

    /// Swap the holders of `rank` and the terminal rank
    pub async fn demote_to_lowest_rank(&self, rank: u8) -> IndexerResult<()> {
        if rank == LOWEST_RANK {
            return Ok(());
        }

        let (Some(mut upper), Some(mut lowest)) = (
            self.storage.load_slot(rank).await?,
            self.storage.load_slot(LOWEST_RANK).await?,
        ) else {
            return Ok(());
        };

        std::mem::swap(&mut upper.holder, &mut lowest.holder);
        self.storage.save_slot(&upper).await?;
        self.storage.save_slot(&lowest).await?;

        debug!("Demoted {} to rank {}, promoted {} to rank {}", lowest.holder, LOWEST_RANK, upper.holder, rank);
        Ok(())
    }

    /// Points a holder must beat to enter the board
    pub async fn minimum_qualifying_points(&self) -> IndexerResult<BigDecimal> {
        let Some(slot) = self.storage.load_slot(LOWEST_RANK).await? else {
            return Ok(BigDecimal::zero());
        };

        Ok(self
            .storage
            .load_holder(&slot.holder)
            .await?
            .map(|holder| holder.points)
            .unwrap_or_else(BigDecimal::zero))
    }

    /// Put `holder` on the board.
    ///
    /// Holders already on the board are left where they are. While ranks are
    /// vacant the holder takes the highest-numbered one, so the terminal slot
    /// keeps the lowest scorer. On a full board the terminal holder is evicted
    /// and the lowest remaining scorer is moved down into its place. Returns
    /// whether the board changed.
    pub async fn insert_at_lowest_rank(
        &self,
        holder: &Holder,
        aggregate: &LiquidityAggregate,
        block: u64,
    ) -> IndexerResult<bool> {
        if let Some(rank) = self.rank_of(&holder.id).await? {
            debug!("Holder {} already ranked at {}", holder.id, rank);
            return Ok(false);
        }

        if let Some(vacant) = self.highest_vacant_rank().await? {
            let slot = LeaderboardSlot::new(vacant, holder.id.clone(), aggregate.id.clone(), block);
            self.storage.save_slot(&slot).await?;
            info!("Holder {} entered the leaderboard at rank {} with {} points", holder.id, vacant, holder.points);
            return Ok(true);
        }

        let mut slot = self
            .storage
            .load_slot(LOWEST_RANK)
            .await?
            .unwrap_or_else(|| LeaderboardSlot::new(LOWEST_RANK, holder.id.clone(), aggregate.id.clone(), block));
        debug!("Evicting {} from the leaderboard", slot.holder);
        slot.holder = holder.id.clone();
        slot.aggregate = aggregate.id.clone();
        self.storage.save_slot(&slot).await?;

        let mut scored = Vec::with_capacity(LEADERBOARD_SIZE as usize);
        for slot in self.leaderboard().await? {
            if let Some(ranked) = self.storage.load_holder(&slot.holder).await? {
                scored.push((slot.rank, ranked.points));
            }
        }
        if let Some((min_rank, _)) = lowest_scorer(scored) {
            self.demote_to_lowest_rank(min_rank).await?;
        }

        info!("Holder {} entered the leaderboard with {} points", holder.id, holder.points);
        Ok(true)
    }

    /// Populated slots in rank order
    pub async fn leaderboard(&self) -> IndexerResult<Vec<LeaderboardSlot>> {
        let mut slots = Vec::new();
        for rank in 1..=LEADERBOARD_SIZE {
            if let Some(slot) = self.storage.load_slot(rank).await? {
                slots.push(slot);
            }
        }
        Ok(slots)
    }

    pub async fn rank_of(&self, address: &str) -> IndexerResult<Option<u8>> {
        Ok(self
            .leaderboard()
            .await?
            .into_iter()
            .find(|slot| slot.holder == address)
            .map(|slot| slot.rank))
    }

    async fn highest_vacant_rank(&self) -> IndexerResult<Option<u8>> {
        for rank in (1..=LOWEST_RANK).rev() {
            if self.storage.load_slot(rank).await?.is_none() {
                return Ok(Some(rank));
            }
        }
        Ok(None)
    }
}

/// Rank holding the fewest points. Ties resolve to the higher rank number
/// so an already-terminal slot stays put.
fn lowest_scorer(scored: Vec<(u8, BigDecimal)>) -> Option<(u8, BigDecimal)> {
    scored.into_iter().fold(None, |lowest: Option<(u8, BigDecimal)>, (rank, points)| {
        let keep = matches!(&lowest, Some((_, min)) if points > *min);
        if keep {
            lowest
        } else {
            Some((rank, points))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::core::constants::{point_rate, GENESIS_BLOCK, LIQUID_CONTRACT_ADDRESS};
    use std::str::FromStr;

    fn setup() -> (Arc<MemoryStore>, LeaderboardMaintainer<MemoryStore>, LiquidityAggregate) {
        let storage = Arc::new(MemoryStore::new());
        let ledger = HolderLedger::new(storage.clone(), point_rate());
        let maintainer = LeaderboardMaintainer::new(storage.clone(), ledger, 7200);
        (storage, maintainer, LiquidityAggregate::new(LIQUID_CONTRACT_ADDRESS, GENESIS_BLOCK))
    }

    async fn seed_holder(storage: &MemoryStore, id: &str, balance: i128, points: &str, block: u64) -> Holder {
        let mut holder = Holder::new(id, LIQUID_CONTRACT_ADDRESS);
        holder.balance = balance;
        holder.points = BigDecimal::from_str(points).unwrap();
        holder.last_point_update_block = block;
        storage.save_holder(&holder).await.unwrap();
        holder
    }

    #[tokio::test]
    async fn test_empty_board_threshold_is_zero() -> anyhow::Result<()> {
        let (_storage, maintainer, _aggregate) = setup();
        assert_eq!(maintainer.minimum_qualifying_points().await?, BigDecimal::zero());
        assert!(maintainer.leaderboard().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_first_insert_creates_terminal_slot() -> anyhow::Result<()> {
        let (storage, maintainer, aggregate) = setup();
        let holder = seed_holder(&storage, "0xaa", 0, "5", 10).await;

        assert!(maintainer.insert_at_lowest_rank(&holder, &aggregate, 10).await?);

        let slot = storage.load_slot(LOWEST_RANK).await?.unwrap();
        assert_eq!(slot.holder, "0xaa");
        assert_eq!(slot.first_populated_block, 10);
        assert_eq!(slot.aggregate, LIQUID_CONTRACT_ADDRESS);
        assert_eq!(maintainer.minimum_qualifying_points().await?, BigDecimal::from_str("5")?);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_skips_ranked_holder() -> anyhow::Result<()> {
        let (storage, maintainer, aggregate) = setup();
        let holder = seed_holder(&storage, "0xaa", 0, "5", 10).await;

        maintainer.insert_at_lowest_rank(&holder, &aggregate, 10).await?;
        assert!(!maintainer.insert_at_lowest_rank(&holder, &aggregate, 11).await?);
        assert_eq!(maintainer.leaderboard().await?.len(), 1);
        Ok(())
    }

    async fn assert_terminal_holds_minimum(storage: &MemoryStore, maintainer: &LeaderboardMaintainer<MemoryStore>) {
        let min = maintainer.minimum_qualifying_points().await.unwrap();
        for slot in maintainer.leaderboard().await.unwrap() {
            let holder = storage.load_holder(&slot.holder).await.unwrap().unwrap();
            assert!(holder.points >= min, "rank {} holds {} below terminal {}", slot.rank, holder.points, min);
        }
    }

    #[tokio::test]
    async fn test_stronger_entrant_takes_vacant_rank_above_terminal() -> anyhow::Result<()> {
        let (storage, maintainer, aggregate) = setup();
        let weaker = seed_holder(&storage, "0xaa", 0, "5", 10).await;
        let stronger = seed_holder(&storage, "0xbb", 0, "9", 10).await;

        maintainer.insert_at_lowest_rank(&weaker, &aggregate, 10).await?;
        maintainer.insert_at_lowest_rank(&stronger, &aggregate, 11).await?;

        assert_eq!(maintainer.rank_of("0xaa").await?, Some(LOWEST_RANK));
        assert_eq!(maintainer.rank_of("0xbb").await?, Some(LOWEST_RANK - 1));
        assert_eq!(maintainer.minimum_qualifying_points().await?, BigDecimal::from_str("5")?);
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_slot_holds_minimum_after_every_insert() -> anyhow::Result<()> {
        let (storage, maintainer, aggregate) = setup();

        for i in 0..12u64 {
            let holder = seed_holder(&storage, &format!("0x{:02x}", i), 0, &format!("{}", i + 1), 10).await;
            assert!(maintainer.insert_at_lowest_rank(&holder, &aggregate, 10 + i).await?);
            assert_terminal_holds_minimum(&storage, &maintainer).await;
        }

        let board = maintainer.leaderboard().await?;
        assert_eq!(board.len(), LEADERBOARD_SIZE as usize);
        assert_eq!(board[0].holder, "0x09");
        assert_eq!(board[0].first_populated_block, 19);
        assert_eq!(storage.load_slot(LOWEST_RANK).await?.unwrap().holder, "0x02");
        // the two weakest were evicted once the board filled
        assert!(maintainer.rank_of("0x00").await?.is_none());
        assert!(maintainer.rank_of("0x01").await?.is_none());
        assert!(maintainer.rank_of("0x0b").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_moves_lowest_scorer_to_terminal_rank() -> anyhow::Result<()> {
        let (storage, maintainer, mut aggregate) = setup();

        // Balances diverge so accrual reorders the board
        let whale = seed_holder(&storage, "0xaa", 100_000, "1", 100).await;
        let minnow = seed_holder(&storage, "0xbb", 0, "2", 100).await;
        let middle = seed_holder(&storage, "0xcc", 1_000, "3", 100).await;
        maintainer.insert_at_lowest_rank(&whale, &aggregate, 100).await?;
        maintainer.insert_at_lowest_rank(&minnow, &aggregate, 100).await?;
        maintainer.insert_at_lowest_rank(&middle, &aggregate, 100).await?;
        // ranks: 10 = 0xaa, 9 = 0xbb, 8 = 0xcc

        maintainer.refresh(&mut aggregate, 200).await?;

        assert_eq!(aggregate.last_leaderboard_update_block, 200);
        assert_eq!(storage.load_slot(LOWEST_RANK).await?.unwrap().holder, "0xbb");
        assert_eq!(storage.load_slot(9).await?.unwrap().holder, "0xaa");
        assert_eq!(storage.load_slot(8).await?.unwrap().holder, "0xcc");

        let whale = storage.load_holder("0xaa").await?.unwrap();
        assert_eq!(whale.points, BigDecimal::from_str("10001")?);
        assert_eq!(whale.last_point_update_block, 200);
        assert_terminal_holds_minimum(&storage, &maintainer).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_on_terminal_minimum_is_noop_swap() -> anyhow::Result<()> {
        let (storage, maintainer, mut aggregate) = setup();
        let low = seed_holder(&storage, "0xbb", 0, "1", 100).await;
        let high = seed_holder(&storage, "0xaa", 0, "9", 100).await;
        maintainer.insert_at_lowest_rank(&low, &aggregate, 100).await?;
        maintainer.insert_at_lowest_rank(&high, &aggregate, 100).await?;

        maintainer.refresh(&mut aggregate, 150).await?;

        assert_eq!(storage.load_slot(9).await?.unwrap().holder, "0xaa");
        assert_eq!(storage.load_slot(LOWEST_RANK).await?.unwrap().holder, "0xbb");
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_due_after_interval() {
        let (_storage, maintainer, aggregate) = setup();
        assert!(!maintainer.refresh_due(&aggregate, GENESIS_BLOCK + 7200));
        assert!(maintainer.refresh_due(&aggregate, GENESIS_BLOCK + 7201));
    }
}
