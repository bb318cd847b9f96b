//! Benchmarks for the commit path and the replay strategies
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Request files are generated into a temporary directory: a mix of credits
//! and debits spread over the five default clients, with enough debits to
//! hit the limits and exercise the rejection path.

use divan::Bencher;
use rinha_ledger::cli::StrategyType;
use rinha_ledger::io::default_clients;
use rinha_ledger::strategy::{create_strategy, BatchConfig, ReplaySetup};
use rinha_ledger::{Client, Ledger, LedgerConfig, MemoryStore, TransactionRequest};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

fn request_file(requests: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "client,type,value,description").unwrap();
    for i in 0..requests {
        let client = i % 5 + 1;
        let (tx_type, value) = if i % 3 == 0 {
            ("credit", 1_000)
        } else {
            ("debit", 7_500)
        };
        writeln!(file, "{client},{tx_type},{value},req {}", i % 1000).unwrap();
    }
    file.flush().unwrap();
    file
}

#[divan::bench(args = [1_000, 100_000])]
fn sync_replay(bencher: Bencher, requests: usize) {
    let input = request_file(requests);

    bencher.bench_local(|| {
        let strategy = create_strategy(StrategyType::Sync, None, ReplaySetup::new(default_clients()));
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Replay failed");
    });
}

#[divan::bench(args = [1_000, 100_000])]
fn async_replay(bencher: Bencher, requests: usize) {
    let input = request_file(requests);

    bencher.bench_local(|| {
        let strategy = create_strategy(
            StrategyType::Async,
            Some(BatchConfig::default()),
            ReplaySetup::new(default_clients()),
        );
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Replay failed");
    });
}

/// Single uncontended commit on a warm ledger
#[divan::bench]
fn single_commit(bencher: Bencher) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let store = Arc::new(MemoryStore::new([Client::new(1, "bench", 0)]));
    let ledger = Ledger::new(store, LedgerConfig::default());

    bencher.bench_local(|| {
        runtime
            .block_on(ledger.apply_transaction(1, TransactionRequest::new(1, "credit", "bench")))
            .unwrap()
    });
}

/// 64 tasks committing to one client at once
#[divan::bench]
fn contended_commits(bencher: Bencher) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();
    let store = Arc::new(MemoryStore::new([Client::new(1, "bench", 0)]));
    let ledger = Ledger::new(store, LedgerConfig::default());

    bencher.bench_local(|| {
        runtime.block_on(async {
            let tasks: Vec<_> = (0..64)
                .map(|_| {
                    let ledger = ledger.clone();
                    tokio::spawn(async move {
                        ledger
                            .apply_transaction(1, TransactionRequest::new(1, "credit", "bench"))
                            .await
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }
        })
    });
}
