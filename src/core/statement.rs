//! Statement reader
//!
//! Read-only view joining a client's current balance and limit with its most
//! recent transactions.

use super::ledger::LedgerConfig;
use super::traits::LedgerStore;
use crate::types::{ClientId, LedgerError, Statement, STATEMENT_SIZE};
use chrono::Utc;
use std::sync::Arc;

/// Serves [`Statement`] snapshots from a store
pub struct StatementReader<S> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S> Clone for StatementReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: LedgerStore> StatementReader<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Read a client's statement
    ///
    /// Returns the balance, limit and up to [`STATEMENT_SIZE`] transactions,
    /// newest first. `as_of` is stamped when the read is served.
    ///
    /// # Errors
    ///
    /// * `ClientNotFound` for an unknown client
    /// * `LockTimeout` if the row stays busy past the configured timeout
    pub async fn get_statement(&self, client: ClientId) -> Result<Statement, LedgerError> {
        let read = tokio::time::timeout(
            self.config.lock_timeout,
            self.store.statement(client, STATEMENT_SIZE),
        )
        .await
        .map_err(|_| LedgerError::lock_timeout(client, self.config.lock_timeout_ms()))??;

        let (row, transactions) = read.ok_or_else(|| LedgerError::client_not_found(client))?;

        Ok(Statement {
            client: row.id,
            balance: row.balance,
            limit: row.limit,
            as_of: Utc::now(),
            transactions,
        })
    }
}
