//! Holder ledger: lazy holder creation and point accrual

use crate::core::{normalize_address, EntityStore, IndexerResult};
use crate::domain::models::{Holder, LiquidityAggregate};
use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns per-holder balance and point bookkeeping
pub struct HolderLedger<S: EntityStore + ?Sized> {
    storage: Arc<S>,
    point_rate: BigDecimal,
}

impl<S: EntityStore + ?Sized> Clone for HolderLedger<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            point_rate: self.point_rate.clone(),
        }
    }
}

impl<S: EntityStore + ?Sized> HolderLedger<S> {
    pub fn new(storage: Arc<S>, point_rate: BigDecimal) -> Self {
        Self { storage, point_rate }
    }

    /// Load the holder or build a zeroed one owned by `aggregate`.
    ///
    /// A new holder is counted on the aggregate but not persisted; the caller
    /// saves it after mutating.
    pub async fn fetch_or_create(
        &self,
        address: &str,
        aggregate: &mut LiquidityAggregate,
    ) -> IndexerResult<Holder> {
        let address = normalize_address(address);
        if let Some(holder) = self.storage.load_holder(&address).await? {
            return Ok(holder);
        }

        debug!("Creating holder {}", address);
        aggregate.holder_count += 1;
        Ok(Holder::new(address, aggregate.id.clone()))
    }

    /// Accrue points on the current balance up to `current_block`
    pub fn accrue_points(&self, holder: &mut Holder, current_block: u64) {
        if current_block < holder.last_point_update_block {
            warn!(
                "Holder {} last accrued at block {}, ignoring older block {}",
                holder.id, holder.last_point_update_block, current_block
            );
            return;
        }

        let earned = holder.accrue_points(current_block, &self.point_rate);
        debug!("Holder {} earned {} points at block {}", holder.id, earned, current_block);
    }

    pub async fn save(&self, holder: &Holder) -> IndexerResult<()> {
        self.storage.save_holder(holder).await
    }
}
