//! In-process store with per-client row locking
//!
//! This module provides [`MemoryStore`], an implementation of [`LedgerStore`]
//! that keeps every client row and its transaction history in memory.
//!
//! # Design
//!
//! Each client row lives in its own slot:
//!
//! ```text
//! MemoryStore
//!     └── DashMap<ClientId, Arc<ClientSlot>>
//!             ├── id, name, limit        (immutable)
//!             ├── committed: AtomicI64   (lock-free balance hint)
//!             └── row: Arc<Mutex<ClientRow>>
//!                     ├── balance
//!                     └── transactions   (append-only, insertion order)
//! ```
//!
//! # Thread Safety
//!
//! The per-client `tokio::sync::Mutex` plays the role of a row-level exclusive
//! lock: a [`MemoryUnit`] holds it from `begin` until commit or rollback, so
//! two units for the same client never interleave, while units for different
//! clients never touch the same lock. There is no store-wide lock.

use super::traits::{LedgerStore, UnitOfWork};
use crate::types::{Client, ClientId, LedgerError, NewTransaction, Transaction};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Mutable part of a client row
#[derive(Debug)]
struct ClientRow {
    balance: i64,
    transactions: Vec<Transaction>,
}

impl ClientRow {
    /// Commit time for the next transaction
    ///
    /// Clamped to the previous transaction's time so that a clock step
    /// backwards never reorders the history.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.transactions.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        }
    }
}

#[derive(Debug)]
struct ClientSlot {
    id: ClientId,
    name: String,
    limit: i64,

    /// Balance as of the last commit, readable without the row lock
    committed: AtomicI64,

    row: Arc<Mutex<ClientRow>>,
}

impl ClientSlot {
    fn snapshot(&self, balance: i64) -> Client {
        Client {
            id: self.id,
            name: self.name.clone(),
            limit: self.limit,
            balance,
        }
    }
}

/// In-process implementation of [`LedgerStore`]
///
/// The set of clients is fixed at construction.
#[derive(Debug)]
pub struct MemoryStore {
    clients: DashMap<ClientId, Arc<ClientSlot>>,
}

impl MemoryStore {
    /// Create a store holding the given provisioned clients
    ///
    /// Later entries replace earlier ones with the same ID; provisioning
    /// rejects duplicates before they get here.
    pub fn new(clients: impl IntoIterator<Item = Client>) -> Self {
        let clients = clients
            .into_iter()
            .map(|client| {
                let slot = ClientSlot {
                    id: client.id,
                    name: client.name,
                    limit: client.limit,
                    committed: AtomicI64::new(client.balance),
                    row: Arc::new(Mutex::new(ClientRow {
                        balance: client.balance,
                        transactions: Vec::new(),
                    })),
                };
                (client.id, Arc::new(slot))
            })
            .collect();

        Self { clients }
    }

    /// Number of provisioned clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client is provisioned
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn slot(&self, client: ClientId) -> Option<Arc<ClientSlot>> {
        self.clients.get(&client).map(|entry| Arc::clone(entry.value()))
    }
}

impl LedgerStore for MemoryStore {
    type Unit = MemoryUnit;

    fn get_client(&self, client: ClientId) -> Result<Option<Client>, LedgerError> {
        Ok(self
            .slot(client)
            .map(|slot| slot.snapshot(slot.committed.load(Ordering::Acquire))))
    }

    async fn begin(&self, client: ClientId) -> Result<MemoryUnit, LedgerError> {
        let slot = self
            .slot(client)
            .ok_or_else(|| LedgerError::client_not_found(client))?;

        let row = Arc::clone(&slot.row).lock_owned().await;
        let snapshot = slot.snapshot(row.balance);

        Ok(MemoryUnit {
            slot,
            row,
            snapshot,
            pending_transaction: None,
            pending_balance: None,
        })
    }

    async fn statement(
        &self,
        client: ClientId,
        limit: usize,
    ) -> Result<Option<(Client, Vec<Transaction>)>, LedgerError> {
        let Some(slot) = self.slot(client) else {
            return Ok(None);
        };

        let row = slot.row.lock().await;
        let recent = row
            .transactions
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect();

        Ok(Some((slot.snapshot(row.balance), recent)))
    }

    fn clients(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self
            .clients
            .iter()
            .map(|entry| {
                let slot = entry.value();
                slot.snapshot(slot.committed.load(Ordering::Acquire))
            })
            .collect();
        clients.sort_by_key(|client| client.id);
        clients
    }
}

/// Atomic unit over one [`MemoryStore`] client row
///
/// Holds the row lock for its whole lifetime. Dropping it without calling
/// [`UnitOfWork::commit`] discards the staged writes.
#[derive(Debug)]
pub struct MemoryUnit {
    slot: Arc<ClientSlot>,
    row: OwnedMutexGuard<ClientRow>,
    snapshot: Client,
    pending_transaction: Option<NewTransaction>,
    pending_balance: Option<i64>,
}

impl UnitOfWork for MemoryUnit {
    fn client(&self) -> &Client {
        &self.snapshot
    }

    fn insert_transaction(&mut self, transaction: NewTransaction) -> Result<(), LedgerError> {
        let client = self.snapshot.id;
        if transaction.client != client {
            return Err(LedgerError::insert_transaction(
                client,
                "transaction belongs to another client",
            ));
        }
        if self.pending_transaction.is_some() {
            return Err(LedgerError::insert_transaction(
                client,
                "a transaction is already staged in this unit",
            ));
        }

        self.pending_transaction = Some(transaction);
        Ok(())
    }

    fn update_balance(&mut self, balance: i64) -> Result<(), LedgerError> {
        // Same guarantee a CHECK constraint on the row would give
        if balance < self.snapshot.floor() {
            return Err(LedgerError::update_balance(
                self.snapshot.id,
                "balance would fall below the client's limit",
            ));
        }

        self.pending_balance = Some(balance);
        Ok(())
    }

    fn commit(mut self) -> Result<Client, LedgerError> {
        let client = self.snapshot.id;

        let (transaction, balance) = match (
            self.pending_transaction.take(),
            self.pending_balance.take(),
        ) {
            (Some(transaction), Some(balance)) => (transaction, balance),
            (None, None) => return Ok(self.snapshot),
            (Some(_), None) => {
                return Err(LedgerError::update_balance(
                    client,
                    "transaction staged without a balance update",
                ))
            }
            (None, Some(_)) => {
                return Err(LedgerError::insert_transaction(
                    client,
                    "balance update staged without a transaction",
                ))
            }
        };

        let sequence = self.row.transactions.len() as u64 + 1;
        let created_at = self.row.next_timestamp();

        self.row.transactions.push(Transaction {
            client,
            sequence,
            value: transaction.value,
            tx_type: transaction.tx_type,
            description: transaction.description,
            created_at,
        });
        self.row.balance = balance;
        self.slot.committed.store(balance, Ordering::Release);

        self.snapshot.balance = balance;
        Ok(self.snapshot)
    }

    fn rollback(self) {}
}
