//! Concurrency tests for the commit protocol
//!
//! These tests hammer a single client from many tasks on a multi-threaded
//! runtime and check that the balance invariant and the statement history
//! come out exactly as a serial execution would leave them.

use rinha_ledger::{
    Client, Ledger, LedgerConfig, LedgerError, LedgerStore, MemoryStore, StatementReader,
    TransactionRequest, TransactionType,
};
use std::sync::Arc;
use std::time::Duration;

fn setup(clients: Vec<Client>) -> (Arc<MemoryStore>, Ledger<MemoryStore>, StatementReader<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(clients));
    let ledger = Ledger::new(Arc::clone(&store), LedgerConfig::default());
    let reader = StatementReader::new(Arc::clone(&store), LedgerConfig::default());
    (store, ledger, reader)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_debits_never_cross_the_limit() {
    let (_, ledger, reader) = setup(vec![Client::new(1, "alice", 1000)]);

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .apply_transaction(1, TransactionRequest::new(100, "debit", format!("d{i}")))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(LedgerError::InvalidBalance { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, 10);
    assert_eq!(rejected, 10);

    let statement = reader.get_statement(1).await.unwrap();
    assert_eq!(statement.balance, -1000);
    assert_eq!(statement.transactions.len(), 10);
    assert!(statement
        .transactions
        .iter()
        .all(|t| t.tx_type == TransactionType::Debit && t.value == 100));
    let sequences: Vec<u64> = statement.transactions.iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, (1..=10).rev().collect::<Vec<u64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn mixed_traffic_balance_matches_accepted_history() {
    let (store, ledger, _) = setup(vec![Client::new(1, "alice", 0)]);

    let tasks: Vec<_> = (0..100)
        .map(|i| {
            let ledger = ledger.clone();
            let tx_type = if i % 2 == 0 { "credit" } else { "debit" };
            tokio::spawn(async move {
                let result = ledger
                    .apply_transaction(1, TransactionRequest::new(10, tx_type, "mix"))
                    .await;
                (tx_type, result)
            })
        })
        .collect();

    let mut net = 0;
    for task in tasks {
        let (tx_type, result) = task.await.unwrap();
        match (tx_type, result) {
            ("credit", Ok(_)) => net += 10,
            (_, Ok(outcome)) => {
                assert!(outcome.balance >= 0);
                net -= 10;
            }
            ("credit", Err(e)) => panic!("credit rejected: {e}"),
            (_, Err(e)) => assert!(matches!(e, LedgerError::InvalidBalance { .. })),
        }
    }

    let client = store.get_client(1).unwrap().unwrap();
    assert_eq!(client.balance, net);
    assert!(client.balance >= 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn busy_client_does_not_block_others() {
    let store = Arc::new(MemoryStore::new([
        Client::new(1, "alice", 0),
        Client::new(2, "bob", 0),
    ]));
    let ledger = Ledger::new(
        Arc::clone(&store),
        LedgerConfig::new(Duration::from_millis(50)),
    );

    let held = store.begin(1).await.unwrap();

    let other = ledger
        .apply_transaction(2, TransactionRequest::new(5, "credit", "free"))
        .await;
    let blocked = ledger
        .apply_transaction(1, TransactionRequest::new(5, "credit", "busy"))
        .await;
    drop(held);

    assert_eq!(other.unwrap().balance, 5);
    assert_eq!(blocked.unwrap_err(), LedgerError::lock_timeout(1, 50));
    assert_eq!(store.get_client(1).unwrap().unwrap().balance, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rejected_requests_leave_statement_untouched() {
    let (_, ledger, reader) = setup(vec![Client::new(1, "alice", 100)]);
    ledger
        .apply_transaction(1, TransactionRequest::new(100, "debit", "all"))
        .await
        .unwrap();
    let before = reader.get_statement(1).await.unwrap();

    let rejected = [
        TransactionRequest::new(1, "debit", "over"),
        TransactionRequest::new(0, "credit", "zero"),
        TransactionRequest::new(1, "d", "short"),
        TransactionRequest::new(1, "credit", "much too long"),
        TransactionRequest {
            value: 1,
            tx_type: "credit".to_string(),
            description: None,
        },
    ];
    for request in rejected {
        assert!(ledger.apply_transaction(1, request).await.is_err());
    }

    let after = reader.get_statement(1).await.unwrap();
    assert_eq!(after.balance, before.balance);
    assert_eq!(after.limit, before.limit);
    assert_eq!(after.transactions, before.transactions);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn statements_read_consistently_under_load() {
    let (_, ledger, reader) = setup(vec![Client::new(1, "alice", 0)]);

    let writers: Vec<_> = (0..50)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .apply_transaction(1, TransactionRequest::new(2, "credit", "w"))
                    .await
                    .unwrap();
            })
        })
        .collect();

    let readers: Vec<_> = (0..20)
        .map(|_| {
            let reader = reader.clone();
            tokio::spawn(async move {
                let statement = reader.get_statement(1).await.unwrap();
                // Balance always equals twice the number of committed credits
                let committed = statement
                    .transactions
                    .first()
                    .map(|t| t.sequence as i64)
                    .unwrap_or(0);
                assert_eq!(statement.balance, committed * 2);
            })
        })
        .collect();

    for task in writers.into_iter().chain(readers) {
        task.await.unwrap();
    }

    assert_eq!(reader.get_statement(1).await.unwrap().balance, 100);
}
