//! Rinha Ledger Library
//! # Overview
//!
//! A per-client ledger that accepts or rejects credit and debit transactions
//! against an overdraft limit, commits accepted ones atomically, and serves
//! statements of the most recent activity.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Client, Transaction, Statement, LedgerError)
//! - [`core`] - Business logic components:
//!   - [`core::validation`] - Request validation
//!   - [`core::balance`] - Balance invariant rule
//!   - [`core::ledger`] - Atomic per-client commit protocol
//!   - [`core::statement`] - Statement reads
//!   - [`core::store`] - In-process store with per-client row locks
//! - [`io`] - CSV input, output and client provisioning
//! - [`strategy`] - Sequential and client-parallel replay of request files
//! - [`cli`] - CLI arguments parsing
//!
//! # Balance Invariant
//!
//! For every client, at every committed state, `balance >= -limit`. Credits
//! are always accepted; a debit is accepted only if the balance after it is
//! still at or above `-limit`.
//!
//! # Example
//!
//! ```
//! use rinha_ledger::{Client, Ledger, LedgerConfig, MemoryStore, TransactionRequest};
//! use std::sync::Arc;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//! runtime.block_on(async {
//!     let store = Arc::new(MemoryStore::new([Client::new(1, "alice", 1000)]));
//!     let ledger = Ledger::new(store, LedgerConfig::default());
//!
//!     let outcome = ledger
//!         .apply_transaction(1, TransactionRequest::new(1000, "debit", "rent"))
//!         .await
//!         .unwrap();
//!     assert_eq!(outcome.balance, -1000);
//!
//!     assert!(ledger
//!         .apply_transaction(1, TransactionRequest::new(1, "debit", "coffee"))
//!         .await
//!         .is_err());
//! });
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{Ledger, LedgerConfig, LedgerStore, MemoryStore, StatementReader, UnitOfWork};
pub use io::{write_clients_csv, write_statements_csv};
pub use types::{
    Client, ClientId, LedgerError, Statement, Transaction, TransactionOutcome, TransactionRequest,
    TransactionType,
};
