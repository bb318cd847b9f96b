//! Client-related types for the ledger
//!
//! This module defines the Client row: the only mutable shared resource
//! of the ledger.

/// Client identifier
///
/// Clients form a small, fixed, pre-provisioned set of positive integers.
pub type ClientId = u32;

/// Client account state
///
/// `name` and `limit` never change after provisioning. `balance` is only
/// ever written by a ledger commit and never drops below `-limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// The client ID
    pub id: ClientId,

    /// Display name, fixed at provisioning
    pub name: String,

    /// How far the balance may go negative
    ///
    /// Always non-negative.
    pub limit: i64,

    /// Current balance in cents
    pub balance: i64,
}

impl Client {
    /// Create a freshly provisioned client with a zero balance
    pub fn new(id: ClientId, name: impl Into<String>, limit: i64) -> Self {
        Client {
            id,
            name: name.into(),
            limit,
            balance: 0,
        }
    }

    /// Lowest balance this client may reach
    pub fn floor(&self) -> i64 {
        -self.limit
    }
}
