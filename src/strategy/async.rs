//! Asynchronous batch processing strategy
//!
//! Reads requests in batches and replays each batch with one task per client
//! on a multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (client partitioning + tasks)
//!         └── Ledger (per-client atomic commit)
//!             └── MemoryStore (per-client row locks)
//! ```
//!
//! Batches run one after another, so a client's requests are applied in file
//! order even when they span several batches.

use crate::core::BatchProcessor;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_results, ProcessingStrategy, ReplaySetup, ReplayTally};
use crate::types::LedgerError;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of requests per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults.
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "Invalid batch_size (0), using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            tracing::warn!(
                default = default.worker_threads,
                "Invalid worker_threads (0), using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    setup: ReplaySetup,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, setup: ReplaySetup) -> Self {
        Self { config, setup }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| match e.kind() {
                    ErrorKind::NotFound => LedgerError::FileNotFound {
                        path: input_path.display().to_string(),
                    },
                    _ => LedgerError::IoError {
                        message: format!("Failed to open file '{}': {}", input_path.display(), e),
                    },
                })?;

            let mut reader = AsyncReader::new(file.compat());
            let ledger = self.setup.ledger();
            let processor = BatchProcessor::new(ledger.clone());
            let mut tally = ReplayTally::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch so later batches see its commits
                for processed in processor.process_batch(batch).await {
                    tally.record(&processed.record, &processed.result);
                }
            }

            write_results(&ledger, &self.setup, tally, output).await
        })
    }
}
