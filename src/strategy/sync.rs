//! Sequential processing strategy
//!
//! Streams requests with the [`SyncReader`] and applies them one at a time,
//! in file order, on a current-thread runtime. Output is fully deterministic
//! apart from timestamps.

use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_results, ProcessingStrategy, ReplaySetup, ReplayTally};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Sequential processing strategy
///
/// # Examples
///
/// ```no_run
/// use rinha_ledger::io::default_clients;
/// use rinha_ledger::strategy::{ProcessingStrategy, ReplaySetup, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(ReplaySetup::new(default_clients()));
/// strategy
///     .process(Path::new("requests.csv"), &mut std::io::stdout())
///     .expect("Replay failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    setup: ReplaySetup,
}

impl SyncProcessingStrategy {
    pub fn new(setup: ReplaySetup) -> Self {
        Self { setup }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let reader = SyncReader::new(input_path)?;

        // Timers are needed for the lock timeout even with a single thread
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let ledger = self.setup.ledger();
            let mut tally = ReplayTally::default();

            for result in reader {
                match result {
                    Ok(record) => {
                        let outcome = ledger
                            .apply_transaction(record.client, record.request.clone())
                            .await;
                        tally.record(&record, &outcome);
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed record"),
                }
            }

            write_results(&ledger, &self.setup, tally, output).await
        })
    }
}
