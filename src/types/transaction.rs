//! Transaction-related types for the ledger
//!
//! A transaction travels through three shapes:
//! - [`TransactionRequest`]: raw input, not yet trusted
//! - [`TransactionIntent`]: validated input, ready for the ledger
//! - [`Transaction`]: the committed, immutable record owned by the store

use super::client::ClientId;
use super::error::LedgerError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Increases the balance. Never rejected by the balance rule.
    Credit,

    /// Decreases the balance. Rejected when it would cross `-limit`.
    Debit,
}

impl TransactionType {
    /// The direction code as it appears on the wire
    pub fn as_code(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }

    /// Signed effect of `value` on a balance
    ///
    /// Returns `None` if negating `value` overflows.
    pub fn signed(&self, value: i64) -> Option<i64> {
        match self {
            TransactionType::Credit => Some(value),
            TransactionType::Debit => value.checked_neg(),
        }
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    /// Parse a direction code. Matching is exact: no trimming, no case folding.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            _ => Err(LedgerError::invalid_transaction_type(code)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Raw transaction payload as handed over by the request-handling layer
///
/// Nothing here is trusted yet; see [`crate::core::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Magnitude in cents
    pub value: i64,

    /// Direction code, expected to be `credit` or `debit`
    pub tx_type: String,

    /// Free-text description, 1 to 10 characters
    pub description: Option<String>,
}

impl TransactionRequest {
    /// Build a request from its parts
    pub fn new(value: i64, tx_type: impl Into<String>, description: impl Into<String>) -> Self {
        TransactionRequest {
            value,
            tx_type: tx_type.into(),
            description: Some(description.into()),
        }
    }
}

/// A transaction that passed input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    /// Strictly positive magnitude in cents
    pub value: i64,

    /// Direction
    pub tx_type: TransactionType,

    /// Non-empty description of at most ten characters
    pub description: String,
}

/// A transaction row staged inside an atomic unit
///
/// The store assigns the timestamp and sequence number when the unit commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub client: ClientId,
    pub value: i64,
    pub tx_type: TransactionType,
    pub description: String,
}

/// A committed transaction record
///
/// Write-once: never updated or deleted after commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The client that owns this transaction
    pub client: ClientId,

    /// Per-client insertion order, starting at 1
    pub sequence: u64,

    /// Unsigned magnitude in cents
    pub value: i64,

    /// Direction of the magnitude
    pub tx_type: TransactionType,

    /// Description as submitted
    pub description: String,

    /// Commit time assigned by the store
    ///
    /// Never decreases between consecutive transactions of one client.
    pub created_at: DateTime<Utc>,
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOutcome {
    /// The client's (unchanged) limit
    pub limit: i64,

    /// Balance after the commit
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::credit("credit", Some(TransactionType::Credit))]
    #[case::debit("debit", Some(TransactionType::Debit))]
    #[case::short_code("c", None)]
    #[case::uppercase("DEBIT", None)]
    #[case::padded(" credit", None)]
    #[case::empty("", None)]
    fn test_parse_direction_code(#[case] code: &str, #[case] expected: Option<TransactionType>) {
        match (code.parse::<TransactionType>(), expected) {
            (Ok(parsed), Some(expected)) => assert_eq!(parsed, expected),
            (Err(e), None) => assert_eq!(e, LedgerError::invalid_transaction_type(code)),
            (got, expected) => panic!("Expected {:?}, got {:?}", expected, got),
        }
    }

    #[rstest]
    #[case(TransactionType::Credit, 50, Some(50))]
    #[case(TransactionType::Debit, 50, Some(-50))]
    #[case(TransactionType::Debit, i64::MIN, None)]
    fn test_signed_delta(
        #[case] tx_type: TransactionType,
        #[case] value: i64,
        #[case] expected: Option<i64>,
    ) {
        assert_eq!(tx_type.signed(value), expected);
    }

    #[test]
    fn test_display_uses_wire_code() {
        assert_eq!(TransactionType::Credit.to_string(), "credit");
        assert_eq!(TransactionType::Debit.to_string(), "debit");
    }
}
