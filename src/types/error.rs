//! Error types for the ledger
//!
//! This module defines every error the ledger and its replay surface can report.
//!
//! # Error Categories
//!
//! - **Validation**: malformed description, value or direction. Reported before
//!   any store access.
//! - **Business**: unknown client or a debit that would cross the limit. Nothing
//!   is persisted.
//! - **Infrastructure**: the atomic unit could not be acquired or committed, or
//!   the replay input could not be read. Never partially applied.

use super::client::ClientId;
use thiserror::Error;

/// Category of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Business,
    Infrastructure,
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Description is missing or empty
    #[error("Invalid description: a non-empty description is required")]
    InvalidDescription,

    /// Description is longer than ten characters
    #[error("Invalid description length: {length} characters, at most 10 allowed")]
    InvalidDescriptionLength {
        /// Length in characters
        length: usize,
    },

    /// Value is zero or negative
    #[error("Invalid value {value}: must be a positive integer")]
    InvalidValue {
        /// The rejected value
        value: i64,
    },

    /// Direction code is neither `credit` nor `debit`
    #[error("Invalid transaction type '{tx_type}'")]
    InvalidTransactionType {
        /// The rejected direction code
        tx_type: String,
    },

    /// No client with this ID was provisioned
    #[error("Client {client} not found")]
    ClientNotFound {
        /// The unknown client ID
        client: ClientId,
    },

    /// The debit would take the balance below `-limit`
    #[error("Invalid balance for client {client}: balance {balance}, limit {limit}, debit {requested}")]
    InvalidBalance {
        /// Client ID
        client: ClientId,
        /// Balance read inside the atomic unit
        balance: i64,
        /// The client's limit
        limit: i64,
        /// The rejected debit
        requested: i64,
    },

    /// The new balance does not fit in the balance type
    #[error("Arithmetic overflow in {operation} for client {client}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Client ID
        client: ClientId,
    },

    /// The per-client atomic unit could not be acquired in time
    #[error("Timed out after {timeout_ms}ms waiting for client {client}")]
    LockTimeout {
        /// Client ID
        client: ClientId,
        /// Configured bound in milliseconds
        timeout_ms: u64,
    },

    /// The transaction row could not be written
    #[error("Error inserting transaction for client {client}: {message}")]
    InsertTransaction {
        /// Client ID
        client: ClientId,
        /// Store-provided reason
        message: String,
    },

    /// The balance could not be written
    #[error("Error updating balance for client {client}: {message}")]
    UpdateBalance {
        /// Client ID
        client: ClientId,
        /// Store-provided reason
        message: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidDescription
            | LedgerError::InvalidDescriptionLength { .. }
            | LedgerError::InvalidValue { .. }
            | LedgerError::InvalidTransactionType { .. } => ErrorKind::Validation,
            LedgerError::ClientNotFound { .. }
            | LedgerError::InvalidBalance { .. }
            | LedgerError::ArithmeticOverflow { .. } => ErrorKind::Business,
            LedgerError::LockTimeout { .. }
            | LedgerError::InsertTransaction { .. }
            | LedgerError::UpdateBalance { .. }
            | LedgerError::FileNotFound { .. }
            | LedgerError::IoError { .. }
            | LedgerError::ParseError { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Whether this is an infrastructure failure rather than an expected outcome
    pub fn is_infrastructure(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }

    /// Create an InvalidDescriptionLength error
    pub fn invalid_description_length(length: usize) -> Self {
        LedgerError::InvalidDescriptionLength { length }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(value: i64) -> Self {
        LedgerError::InvalidValue { value }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(tx_type: &str) -> Self {
        LedgerError::InvalidTransactionType {
            tx_type: tx_type.to_string(),
        }
    }

    /// Create a ClientNotFound error
    pub fn client_not_found(client: ClientId) -> Self {
        LedgerError::ClientNotFound { client }
    }

    /// Create an InvalidBalance error
    pub fn invalid_balance(client: ClientId, balance: i64, limit: i64, requested: i64) -> Self {
        LedgerError::InvalidBalance {
            client,
            balance,
            limit,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, client: ClientId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            client,
        }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(client: ClientId, timeout_ms: u64) -> Self {
        LedgerError::LockTimeout { client, timeout_ms }
    }

    /// Create an InsertTransaction error
    pub fn insert_transaction(client: ClientId, message: &str) -> Self {
        LedgerError::InsertTransaction {
            client,
            message: message.to_string(),
        }
    }

    /// Create an UpdateBalance error
    pub fn update_balance(client: ClientId, message: &str) -> Self {
        LedgerError::UpdateBalance {
            client,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_description(
        LedgerError::InvalidDescription,
        "Invalid description: a non-empty description is required"
    )]
    #[case::invalid_description_length(
        LedgerError::InvalidDescriptionLength { length: 11 },
        "Invalid description length: 11 characters, at most 10 allowed"
    )]
    #[case::invalid_value(
        LedgerError::InvalidValue { value: -5 },
        "Invalid value -5: must be a positive integer"
    )]
    #[case::invalid_transaction_type(
        LedgerError::InvalidTransactionType { tx_type: "x".to_string() },
        "Invalid transaction type 'x'"
    )]
    #[case::client_not_found(
        LedgerError::ClientNotFound { client: 6 },
        "Client 6 not found"
    )]
    #[case::invalid_balance(
        LedgerError::InvalidBalance { client: 1, balance: -1000, limit: 1000, requested: 1 },
        "Invalid balance for client 1: balance -1000, limit 1000, debit 1"
    )]
    #[case::lock_timeout(
        LedgerError::LockTimeout { client: 2, timeout_ms: 50 },
        "Timed out after 50ms waiting for client 2"
    )]
    #[case::insert_transaction(
        LedgerError::InsertTransaction { client: 3, message: "disk full".to_string() },
        "Error inserting transaction for client 3: disk full"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(LedgerError::InvalidDescription, ErrorKind::Validation)]
    #[case::validation_type(LedgerError::invalid_transaction_type("x"), ErrorKind::Validation)]
    #[case::not_found(LedgerError::client_not_found(9), ErrorKind::Business)]
    #[case::balance(LedgerError::invalid_balance(1, 0, 0, 1), ErrorKind::Business)]
    #[case::overflow(LedgerError::arithmetic_overflow("credit", 1), ErrorKind::Business)]
    #[case::timeout(LedgerError::lock_timeout(1, 10), ErrorKind::Infrastructure)]
    #[case::insert(LedgerError::insert_transaction(1, "x"), ErrorKind::Infrastructure)]
    #[case::update(LedgerError::update_balance(1, "x"), ErrorKind::Infrastructure)]
    fn test_error_kind(#[case] error: LedgerError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
        assert_eq!(error.is_infrastructure(), expected == ErrorKind::Infrastructure);
    }

    #[rstest]
    #[case::client_not_found(
        LedgerError::client_not_found(6),
        LedgerError::ClientNotFound { client: 6 }
    )]
    #[case::invalid_balance(
        LedgerError::invalid_balance(1, -1000, 1000, 1),
        LedgerError::InvalidBalance { client: 1, balance: -1000, limit: 1000, requested: 1 }
    )]
    #[case::update_balance(
        LedgerError::update_balance(1, "row gone"),
        LedgerError::UpdateBalance { client: 1, message: "row gone".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
