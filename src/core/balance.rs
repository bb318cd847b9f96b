//! Balance invariant rule
//!
//! A balance may never end below `-limit`. Only debits can violate that bound.

use crate::types::TransactionType;

/// Outcome of evaluating a transaction against a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCheck {
    /// Balance after applying the transaction
    pub new_balance: i64,

    /// Whether `new_balance` respects the limit
    pub accepted: bool,
}

/// Evaluate a transaction against the balance invariant
///
/// The check is made on the post-transaction balance: accepted iff
/// `balance + delta >= -limit`, where delta is `+value` for credits and
/// `-value` for debits. Credits are always accepted.
///
/// Returns `None` when the new balance does not fit in an `i64`.
pub fn evaluate(
    balance: i64,
    limit: i64,
    tx_type: TransactionType,
    value: i64,
) -> Option<BalanceCheck> {
    let new_balance = balance.checked_add(tx_type.signed(value)?)?;

    let accepted = match tx_type {
        TransactionType::Credit => true,
        TransactionType::Debit => new_balance >= -limit,
    };

    Some(BalanceCheck {
        new_balance,
        accepted,
    })
}
