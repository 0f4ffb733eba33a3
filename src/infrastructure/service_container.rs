//! Service container for dependency injection

use crate::adapters::ethereum::RpcContractReader;
use crate::adapters::source::JsonlEventSource;
use crate::adapters::storage::{MemoryStore, RocksDBStore};
use crate::config::{IndexerConfig, StorageBackend};
use crate::core::{normalize_address, ContractReader, EntityStore, IndexerResult};
use crate::domain::models::{Holder, LeaderboardSlot, LiquidityAggregate};
use crate::domain::processors::{EventRegistry, RecordOutcome};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub type DynRegistry = EventRegistry<dyn EntityStore, dyn ContractReader>;

/// Totals from one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub recorded: u64,
    pub duplicates: u64,
    pub excluded: u64,
}

/// Service container managing all dependencies
pub struct ServiceContainer {
    /// Configuration
    pub config: IndexerConfig,

    pub storage: Arc<dyn EntityStore>,

    pub reader: Arc<dyn ContractReader>,

    pub registry: Arc<DynRegistry>,
}

impl ServiceContainer {
    /// Initialize the service container from configuration
    pub async fn new(config: IndexerConfig) -> IndexerResult<Self> {
        info!("Initializing service container");

        let storage: Arc<dyn EntityStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::RocksDB => Arc::new(RocksDBStore::open(&config.storage.rocksdb).await?),
        };
        info!("Storage backend initialized: {:?}", config.storage.backend);

        let params = config.engine_params()?;
        let reader: Arc<dyn ContractReader> =
            Arc::new(RpcContractReader::new(&config.rpc, &params.contract_address));

        Self::with_components(config, storage, reader)
    }

    /// Build the container around already constructed ports
    pub fn with_components(
        config: IndexerConfig,
        storage: Arc<dyn EntityStore>,
        reader: Arc<dyn ContractReader>,
    ) -> IndexerResult<Self> {
        let params = config.engine_params()?;
        let registry = Arc::new(EventRegistry::new(storage.clone(), reader.clone(), params));

        info!("Event registry initialized");

        Ok(Self {
            config,
            storage,
            reader,
            registry,
        })
    }

    /// Feed every event of a JSONL file through the registry, in file order
    pub async fn replay(&self, path: impl AsRef<Path>) -> IndexerResult<ReplaySummary> {
        let mut source = JsonlEventSource::open(path).await?;
        let mut summary = ReplaySummary::default();
        let mut last_block = None;

        while let Some(event) = source.next_event().await? {
            last_block = Some(*event.block());
            match self.registry.process(&event).await? {
                RecordOutcome::Recorded => summary.recorded += 1,
                RecordOutcome::Duplicate => summary.duplicates += 1,
                RecordOutcome::Excluded => summary.excluded += 1,
            }
        }

        info!(
            "Replay finished: {} recorded, {} duplicates, {} excluded",
            summary.recorded, summary.duplicates, summary.excluded
        );
        if let Some(block) = last_block {
            if let Some(time) = block.datetime() {
                info!("Caught up to block {} at {}", block.number, time.to_rfc3339());
            }
        }
        Ok(summary)
    }

    pub async fn aggregate(&self) -> IndexerResult<Option<LiquidityAggregate>> {
        let id = &self.registry.params().contract_address;
        self.storage.load_aggregate(id).await
    }

    pub async fn holder(&self, address: &str) -> IndexerResult<Option<Holder>> {
        self.storage.load_holder(&normalize_address(address)).await
    }

    pub async fn leaderboard(&self) -> IndexerResult<Vec<LeaderboardSlot>> {
        self.registry.leaderboard().await
    }

    /// Perform health check on all services
    pub async fn health_check(&self) -> IndexerResult<()> {
        info!("Performing health check");
        self.storage.health_check().await?;
        info!("All services healthy");
        Ok(())
    }
}
