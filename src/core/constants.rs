//! Protocol constants for the Liquid token deployment

use bigdecimal::BigDecimal;

/// Address of the Liquid token contract; also the id of the aggregate record
pub const LIQUID_CONTRACT_ADDRESS: &str = "0xc618d56b6d606e59c6b87af724ab5a91eb40d1cb";

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Blocks that must elapse before the leaderboard is fully re-scanned
pub const LEADERBOARD_REFRESH_INTERVAL: u64 = 7200;

/// Block the leaderboard refresh clock starts from
pub const GENESIS_BLOCK: u64 = 11_731_586;

pub const LEADERBOARD_SIZE: u8 = 10;

/// Points awarded per token held per block (0.001)
pub fn point_rate() -> BigDecimal {
    BigDecimal::new(1.into(), 3)
}

/// Fraction of every sell that the contract burns (0.006)
pub fn sell_fee_rate() -> BigDecimal {
    BigDecimal::new(6.into(), 3)
}
