//! Core business logic module
//!
//! This module contains the transaction-commit protocol and its collaborators:
//! - `validation` - Input Validator for transaction requests
//! - `balance` - Balance Invariant Rule
//! - `ledger` - Per-client atomic commit of transactions
//! - `statement` - Statement Reader
//! - `traits` - Store contract consumed by the ledger
//! - `store` - In-process store with per-client row locking
//! - `batch_processor` - Client-partitioned replay of request batches

pub mod balance;
pub mod batch_processor;
pub mod ledger;
pub mod statement;
pub mod store;
pub mod traits;
pub mod validation;

pub use balance::{evaluate, BalanceCheck};
pub use batch_processor::{BatchProcessor, ProcessingResult, RequestRecord};
pub use ledger::{Ledger, LedgerConfig};
pub use statement::StatementReader;
pub use store::{MemoryStore, MemoryUnit};
pub use traits::{LedgerStore, UnitOfWork};
pub use validation::validate;
