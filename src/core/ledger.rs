//! Transaction commit protocol
//!
//! This module provides the [`Ledger`], which accepts or rejects each
//! transaction against the balance invariant and commits accepted ones as a
//! single atomic unit.
//!
//! # Protocol
//!
//! ```text
//! validate ──> get_client (hint) ──> begin (per-client lock, bounded wait)
//!                                       │
//!                     re-read balance/limit inside the unit
//!                                       │
//!                          evaluate balance rule
//!                        ┌──────────────┴──────────────┐
//!                    rejected                       accepted
//!                rollback, InvalidBalance   insert transaction + update balance
//!                                                  commit
//! ```
//!
//! # Thread Safety
//!
//! The ledger is cheap to clone and safe to share across tasks. Commits for the
//! same client are serialized by the store's per-client unit; commits for
//! different clients never wait on each other. The ledger never retries.

use super::balance;
use super::traits::{LedgerStore, UnitOfWork};
use super::validation::validate;
use crate::types::{
    ClientId, LedgerError, NewTransaction, TransactionIntent, TransactionOutcome,
    TransactionRequest,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Configuration shared by the ledger and the statement reader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Longest wait for a client's row before giving up
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(2),
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig with a custom lock timeout
    ///
    /// A zero timeout would fail every contended commit, so it falls back to
    /// the default.
    pub fn new(lock_timeout: Duration) -> Self {
        let default = Self::default();

        let lock_timeout = if lock_timeout.is_zero() {
            tracing::warn!(
                default_ms = default.lock_timeout.as_millis() as u64,
                "Invalid lock timeout (0ms), using default"
            );
            default.lock_timeout
        } else {
            lock_timeout
        };

        Self { lock_timeout }
    }

    pub(crate) fn lock_timeout_ms(&self) -> u64 {
        u64::try_from(self.lock_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Per-client atomic commit of transactions
pub struct Ledger<S> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Create a ledger over a shared store handle
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The store this ledger commits to
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validate and commit a raw transaction request
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionOutcome)` with the new balance and the limit
    /// * `Err(LedgerError)` with a validation error (nothing read), a business
    ///   rejection (nothing written) or an infrastructure failure (nothing
    ///   written)
    pub async fn apply_transaction(
        &self,
        client: ClientId,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, LedgerError> {
        let intent = validate(&request)?;
        self.commit(client, &intent).await
    }

    /// Commit an already validated transaction
    ///
    /// Runs the read-evaluate-write sequence inside one atomic unit for
    /// `client`. See the module documentation for the full protocol.
    pub async fn commit(
        &self,
        client: ClientId,
        intent: &TransactionIntent,
    ) -> Result<TransactionOutcome, LedgerError> {
        // Existence check only; the balance read here may already be stale
        if self.store.get_client(client)?.is_none() {
            return Err(LedgerError::client_not_found(client));
        }

        let mut unit = tokio::time::timeout(self.config.lock_timeout, self.store.begin(client))
            .await
            .map_err(|_| {
                error!(client, timeout_ms = self.config.lock_timeout_ms(), "Lock wait timed out");
                LedgerError::lock_timeout(client, self.config.lock_timeout_ms())
            })??;

        let row = unit.client();
        let (balance, limit) = (row.balance, row.limit);

        let check = match balance::evaluate(balance, limit, intent.tx_type, intent.value) {
            Some(check) => check,
            None => {
                unit.rollback();
                return Err(LedgerError::arithmetic_overflow(
                    intent.tx_type.as_code(),
                    client,
                ));
            }
        };

        if !check.accepted {
            unit.rollback();
            debug!(client, balance, limit, value = intent.value, "Debit rejected");
            return Err(LedgerError::invalid_balance(
                client,
                balance,
                limit,
                intent.value,
            ));
        }

        unit.insert_transaction(NewTransaction {
            client,
            value: intent.value,
            tx_type: intent.tx_type,
            description: intent.description.clone(),
        })?;
        unit.update_balance(check.new_balance)?;

        let committed = unit.commit().inspect_err(|e| {
            error!(client, error = %e, "Commit failed");
        })?;

        debug!(
            client,
            tx_type = %intent.tx_type,
            value = intent.value,
            balance = committed.balance,
            "Transaction committed"
        );

        Ok(TransactionOutcome {
            limit: committed.limit,
            balance: committed.balance,
        })
    }
}
