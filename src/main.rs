//! Rinha Ledger CLI
//!
//! Replays a CSV file of credit/debit requests against a freshly provisioned
//! ledger and prints the final client summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.csv > clients.csv
//! cargo run -- --strategy sync requests.csv > clients.csv
//! cargo run -- --strategy async --batch-size 2000 --workers 8 requests.csv > clients.csv
//! cargo run -- --clients clients.csv --statements statements.csv requests.csv
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the filter
//! (default `rinha_ledger=info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rinha_ledger::cli;
use rinha_ledger::io::{default_clients, load_clients};
use rinha_ledger::strategy::{self, ReplaySetup};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rinha_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let clients = match &args.clients {
        Some(path) => match load_clients(path) {
            Ok(clients) => clients,
            Err(e) => {
                error!(error = %e, "Failed to load clients");
                process::exit(1);
            }
        },
        None => default_clients(),
    };
    info!(clients = clients.len(), strategy = ?args.strategy, "Starting replay");

    let setup = ReplaySetup {
        clients,
        ledger_config: args.to_ledger_config(),
        statements_path: args.statements.clone(),
    };

    let config = if matches!(args.strategy, cli::StrategyType::Async) {
        Some(args.to_batch_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy.clone(), config, setup);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "Replay failed");
        process::exit(1);
    }
}
