//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `client`: Client account rows
//! - `transaction`: Transaction requests, intents and committed records
//! - `statement`: Read-only statement snapshots
//! - `error`: Error types for the ledger

pub mod client;
pub mod error;
pub mod statement;
pub mod transaction;

pub use client::{Client, ClientId};
pub use error::{ErrorKind, LedgerError};
pub use statement::{Statement, STATEMENT_SIZE};
pub use transaction::{
    NewTransaction, Transaction, TransactionIntent, TransactionOutcome, TransactionRequest,
    TransactionType,
};
