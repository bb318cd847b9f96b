//! Replay strategies
//!
//! A strategy runs a complete replay: read transaction requests from a CSV
//! file, apply each one through a [`Ledger`] over a freshly provisioned
//! [`MemoryStore`], then write the final client summary (and optionally the
//! statements). Strategies are selected at runtime.

use crate::cli::StrategyType;
use crate::core::{
    Ledger, LedgerConfig, LedgerStore, MemoryStore, RequestRecord, StatementReader,
};
use crate::io::{write_clients_csv, write_statements_csv};
use crate::types::{Client, ErrorKind, LedgerError, TransactionOutcome};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Everything a replay needs besides its input
#[derive(Clone, Debug)]
pub struct ReplaySetup {
    /// Clients to provision before the first request
    pub clients: Vec<Client>,

    /// Lock timeout shared by the ledger and the statement reader
    pub ledger_config: LedgerConfig,

    /// Where to write per-client statements, if anywhere
    pub statements_path: Option<PathBuf>,
}

impl ReplaySetup {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            clients,
            ledger_config: LedgerConfig::default(),
            statements_path: None,
        }
    }

    /// Provision a store and a ledger over it
    pub(crate) fn ledger(&self) -> Ledger<MemoryStore> {
        let store = Arc::new(MemoryStore::new(self.clients.iter().cloned()));
        Ledger::new(store, self.ledger_config.clone())
    }
}

/// Replay strategy trait
pub trait ProcessingStrategy: Send + Sync {
    /// Replay requests from `input_path` and write the client summary to `output`
    ///
    /// # Errors
    ///
    /// Only fatal problems are returned: an unreadable input, a failed
    /// runtime or an unwritable output. Malformed rows and rejected
    /// transactions are logged and the replay continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only applies to the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    setup: ReplaySetup,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(setup)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, setup))
        }
    }
}

/// Running totals of a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReplayTally {
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl ReplayTally {
    /// Count and log one ledger answer
    pub(crate) fn record(
        &mut self,
        record: &RequestRecord,
        result: &Result<TransactionOutcome, LedgerError>,
    ) {
        match result {
            Ok(outcome) => {
                self.accepted += 1;
                debug!(
                    client = record.client,
                    balance = outcome.balance,
                    "Transaction accepted"
                );
            }
            Err(e) => match e.kind() {
                ErrorKind::Validation | ErrorKind::Business => {
                    self.rejected += 1;
                    warn!(client = record.client, error = %e, "Transaction rejected");
                }
                ErrorKind::Infrastructure => {
                    self.failed += 1;
                    error!(client = record.client, error = %e, "Transaction failed");
                }
            },
        }
    }
}

/// Write the client summary and, when requested, the statements file
pub(crate) async fn write_results(
    ledger: &Ledger<MemoryStore>,
    setup: &ReplaySetup,
    tally: ReplayTally,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    info!(
        accepted = tally.accepted,
        rejected = tally.rejected,
        failed = tally.failed,
        "Replay finished"
    );

    let clients = ledger.store().clients();
    write_clients_csv(&clients, output)?;

    if let Some(path) = &setup.statements_path {
        let reader = StatementReader::new(Arc::clone(ledger.store()), setup.ledger_config.clone());
        let mut statements = Vec::with_capacity(clients.len());
        for client in &clients {
            statements.push(reader.get_statement(client.id).await?);
        }

        let mut file = std::fs::File::create(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to create '{}': {}", path.display(), e),
        })?;
        write_statements_csv(&statements, &mut file)?;
        info!(path = %path.display(), "Statements written");
    }

    Ok(())
}
