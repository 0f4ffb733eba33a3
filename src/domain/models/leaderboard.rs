//! Leaderboard slot model

use crate::core::constants::LEADERBOARD_SIZE;
use serde::{Deserialize, Serialize};

/// Rank of the terminal slot, always the lowest tracked holder
pub const LOWEST_RANK: u8 = LEADERBOARD_SIZE;

/// One of the fixed ranks 1..=10; only stored once populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardSlot {
    pub rank: u8,
    /// Address of the holder occupying this rank
    pub holder: String,
    /// Block at which this rank was first populated
    pub first_populated_block: u64,
    pub aggregate: String,
}

impl LeaderboardSlot {
    pub fn new(
        rank: u8,
        holder: impl Into<String>,
        aggregate: impl Into<String>,
        first_populated_block: u64,
    ) -> Self {
        Self {
            rank,
            holder: holder.into(),
            first_populated_block,
            aggregate: aggregate.into(),
        }
    }

    pub fn is_valid_rank(rank: u8) -> bool {
        (1..=LEADERBOARD_SIZE).contains(&rank)
    }
}
