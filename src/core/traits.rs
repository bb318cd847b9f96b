//! Store contract consumed by the ledger
//!
//! The ledger talks to its backing store only through these two traits, so an
//! in-process store and a relational one are interchangeable.

use crate::types::{Client, ClientId, LedgerError, NewTransaction, Transaction};
use std::future::Future;

/// Backing store for client rows and their transaction history
///
/// Implementations must serialize concurrent [`LedgerStore::begin`] calls for
/// the same client while letting different clients proceed independently.
pub trait LedgerStore: Send + Sync + 'static {
    /// Atomic unit handed out by [`LedgerStore::begin`]
    type Unit: UnitOfWork;

    /// Read a client row outside of any atomic unit
    ///
    /// The result is a hint: it may be stale by the time the caller acts on it.
    fn get_client(&self, client: ClientId) -> Result<Option<Client>, LedgerError>;

    /// Open an atomic unit holding the client's row exclusively
    ///
    /// Resolves once no other unit for the same client is open. Fails with
    /// `ClientNotFound` for an unknown client. Cancelling the future releases
    /// nothing because nothing has been acquired yet.
    fn begin(&self, client: ClientId) -> impl Future<Output = Result<Self::Unit, LedgerError>> + Send;

    /// Read a client row joined with its `limit` most recent transactions
    ///
    /// Transactions come newest first. Returns `None` for an unknown client.
    fn statement(
        &self,
        client: ClientId,
        limit: usize,
    ) -> impl Future<Output = Result<Option<(Client, Vec<Transaction>)>, LedgerError>> + Send;

    /// Snapshot of every client's committed state, sorted by ID
    fn clients(&self) -> Vec<Client>;
}

/// All-or-nothing unit of work over a single client row
///
/// Writes are staged and only become visible on [`UnitOfWork::commit`].
/// Dropping a unit without committing is a rollback.
pub trait UnitOfWork: Send {
    /// The client row as read inside the unit
    fn client(&self) -> &Client;

    /// Stage a transaction row
    fn insert_transaction(&mut self, transaction: NewTransaction) -> Result<(), LedgerError>;

    /// Stage a new balance for the client row
    fn update_balance(&mut self, balance: i64) -> Result<(), LedgerError>;

    /// Apply every staged write, or none of them
    ///
    /// Returns the client row as committed.
    fn commit(self) -> Result<Client, LedgerError>;

    /// Discard every staged write
    fn rollback(self);
}
