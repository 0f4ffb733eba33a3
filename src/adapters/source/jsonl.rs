//! JSON Lines event source
//!
//! Reads one decoded `LiquidEvent` per line, in the order the events were
//! emitted on chain.

use crate::core::{IndexerError, IndexerResult};
use crate::domain::models::LiquidEvent;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

pub struct JsonlEventSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    last_block: Option<u64>,
}

impl JsonlEventSource {
    pub async fn open(path: impl AsRef<Path>) -> IndexerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| IndexerError::Other(anyhow::anyhow!("cannot open {}: {}", path.display(), e)))?;

        info!("Reading events from {}", path.display());

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_number: 0,
            last_block: None,
        })
    }

    /// Next event, or `None` at end of file. Blank lines are skipped.
    pub async fn next_event(&mut self) -> IndexerResult<Option<LiquidEvent>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| IndexerError::Other(anyhow::anyhow!("read {}: {}", self.path.display(), e)))?;

            let Some(line) = line else {
                return Ok(None);
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let event: LiquidEvent = serde_json::from_str(&line).map_err(|e| IndexerError::InvalidEvent {
                event_id: format!("{}:{}", self.path.display(), self.line_number),
                reason: e.to_string(),
            })?;

            let block = event.block().number;
            if let Some(last) = self.last_block {
                if block < last {
                    warn!(
                        "Event {} at block {} arrived after block {} (line {})",
                        event.event_id(),
                        block,
                        last,
                        self.line_number
                    );
                }
            }
            self.last_block = Some(block);

            return Ok(Some(event));
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
