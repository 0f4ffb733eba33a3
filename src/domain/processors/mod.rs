//! Domain processors
//!
//! State-update rules that turn ordered contract events into holder,
//! aggregate and leaderboard entities.

mod aggregate;
mod holder;
mod leaderboard;
mod recorder;
mod registry;

pub use aggregate::AggregateTracker;
pub use holder::HolderLedger;
pub use leaderboard::LeaderboardMaintainer;
pub use recorder::{RecordOutcome, TransactionRecorder};
pub use registry::EventRegistry;
