//! Batch processing with client-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which replays batches of
//! transaction requests through a [`Ledger`] with one task per client.
//!
//! # Design
//!
//! The processor partitions a batch by client ID. Each client's requests run
//! sequentially in their original order on their own tokio task, so different
//! clients commit concurrently while each client's history matches the input
//! order. The ledger's per-client unit still guards every commit, so this
//! ordering is a property of the replay, not a correctness requirement.

use std::collections::HashMap;

use super::ledger::Ledger;
use super::traits::LedgerStore;
use crate::types::{ClientId, LedgerError, TransactionOutcome, TransactionRequest};
use tracing::error;

/// A transaction request addressed to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub client: ClientId,
    pub request: TransactionRequest,
}

/// Result of processing a single request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was processed
    pub record: RequestRecord,

    /// The ledger's answer
    pub result: Result<TransactionOutcome, LedgerError>,
}

/// Batch processor with client-based partitioning
pub struct BatchProcessor<S> {
    ledger: Ledger<S>,
}

impl<S> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
        }
    }
}

impl<S: LedgerStore> BatchProcessor<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self { ledger }
    }

    /// Partition a batch of requests by client ID
    ///
    /// # Guarantees
    ///
    /// - Each request appears in exactly one sub-batch
    /// - Requests for each client keep their original order
    pub fn partition_by_client(
        &self,
        batch: Vec<RequestRecord>,
    ) -> HashMap<ClientId, Vec<RequestRecord>> {
        let mut client_batches: HashMap<ClientId, Vec<RequestRecord>> = HashMap::new();

        for record in batch {
            client_batches
                .entry(record.client)
                .or_default()
                .push(record);
        }

        client_batches
    }

    /// Apply one client's requests sequentially, in order
    ///
    /// Failures are captured in the results and do not stop the sequence.
    pub async fn process_client_requests(
        &self,
        records: Vec<RequestRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let result = self
                .ledger
                .apply_transaction(record.client, record.request.clone())
                .await;
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch with one tokio task per client
    ///
    /// Results for a given client are in input order; results across clients
    /// are in no particular order.
    pub async fn process_batch(&self, batch: Vec<RequestRecord>) -> Vec<ProcessingResult> {
        let client_batches = self.partition_by_client(batch);

        let mut tasks = Vec::with_capacity(client_batches.len());
        for (_client, records) in client_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_client_requests(records).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(client_results) => results.extend(client_results),
                Err(e) => error!(error = %e, "Client task panicked"),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::LedgerConfig;
    use crate::core::store::MemoryStore;
    use crate::types::Client;
    use std::sync::Arc;

    fn record(client: ClientId, value: i64, tx_type: &str) -> RequestRecord {
        RequestRecord {
            client,
            request: TransactionRequest::new(value, tx_type, "batch"),
        }
    }

    fn processor() -> (Arc<MemoryStore>, BatchProcessor<MemoryStore>) {
        let store = Arc::new(MemoryStore::new([
            Client::new(1, "a", 100),
            Client::new(2, "b", 0),
            Client::new(3, "c", 50),
        ]));
        let ledger = Ledger::new(Arc::clone(&store), LedgerConfig::default());
        (store, BatchProcessor::new(ledger))
    }

    #[test]
    fn test_partition_keeps_per_client_order() {
        let (_, processor) = processor();
        let batch = vec![
            record(1, 1, "credit"),
            record(2, 2, "credit"),
            record(1, 3, "debit"),
            record(3, 4, "credit"),
            record(1, 5, "credit"),
        ];

        let partitions = processor.partition_by_client(batch);

        assert_eq!(partitions.len(), 3);
        let values: Vec<i64> = partitions[&1].iter().map(|r| r.request.value).collect();
        assert_eq!(values, vec![1, 3, 5]);
        assert_eq!(partitions[&2].len(), 1);
        assert_eq!(partitions[&3].len(), 1);
    }

    #[tokio::test]
    async fn test_process_client_requests_in_order() {
        let (store, processor) = processor();

        // Order matters: the credit has to land before the second debit
        let results = processor
            .process_client_requests(vec![
                record(2, 10, "credit"),
                record(2, 10, "debit"),
                record(2, 1, "debit"),
            ])
            .await;

        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_ok());
        assert!(matches!(
            results[2].result,
            Err(LedgerError::InvalidBalance { .. })
        ));
        assert_eq!(store.get_client(2).unwrap().unwrap().balance, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_across_clients() {
        let (store, processor) = processor();
        let batch = vec![
            record(1, 100, "debit"),
            record(2, 30, "credit"),
            record(3, 60, "debit"),
            record(1, 1, "debit"),
            record(9, 1, "credit"),
        ];

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 5);
        let failures = results.iter().filter(|r| r.result.is_err()).count();
        assert_eq!(failures, 3);
        assert!(results.iter().any(|r| r.record.client == 9
            && r.result == Err(LedgerError::client_not_found(9))));

        let balances: Vec<i64> = store.clients().iter().map(|c| c.balance).collect();
        assert_eq!(balances, vec![-100, 30, 0]);
    }
}
