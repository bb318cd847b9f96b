use crate::core::LedgerConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay transaction requests against a client ledger
#[derive(Parser, Debug)]
#[command(name = "rinha-ledger")]
#[command(about = "Replay credit/debit requests against a client ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transaction requests
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for the replay
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for client-parallel batches"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// How long to wait for a busy client row
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        help = "Lock wait timeout in milliseconds (default: 2000)"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Client provisioning file
    #[arg(
        long = "clients",
        value_name = "CLIENTS",
        help = "CSV with columns client,name,limit (default: the five built-in clients)"
    )]
    pub clients: Option<PathBuf>,

    /// Statements output file
    #[arg(
        long = "statements",
        value_name = "PATH",
        help = "Also write each client's statement to this CSV file"
    )]
    pub statements: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a LedgerConfig from CLI arguments, falling back to defaults
    pub fn to_ledger_config(&self) -> LedgerConfig {
        match self.lock_timeout_ms {
            Some(ms) => LedgerConfig::new(Duration::from_millis(ms)),
            None => LedgerConfig::default(),
        }
    }
}
