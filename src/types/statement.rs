//! Statement snapshot returned by the statement reader

use super::client::ClientId;
use super::transaction::Transaction;
use chrono::{DateTime, Utc};

/// Maximum number of transactions a statement carries
pub const STATEMENT_SIZE: usize = 10;

/// Read-only snapshot of a client's balance and most recent transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub client: ClientId,

    /// Balance at the time of the read
    pub balance: i64,

    /// The client's limit
    pub limit: i64,

    /// Wall-clock time the read was served
    ///
    /// Reflects freshness of the snapshot only, never a transaction time.
    pub as_of: DateTime<Utc>,

    /// Up to [`STATEMENT_SIZE`] transactions, newest first
    pub transactions: Vec<Transaction>,
}
