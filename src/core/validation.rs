//! Input validation for transaction requests
//!
//! Pure shape checks run before a request reaches the ledger. Rules are applied
//! in a fixed order and the first failing rule wins.

use crate::types::{LedgerError, TransactionIntent, TransactionRequest, TransactionType};

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 10;

/// Validate a raw request into a [`TransactionIntent`]
///
/// Order of checks:
/// 1. description present and non-empty (`InvalidDescription`)
/// 2. description at most ten characters (`InvalidDescriptionLength`)
/// 3. value strictly positive (`InvalidValue`)
/// 4. direction code is `credit` or `debit` (`InvalidTransactionType`)
///
/// Length counts characters, not bytes, so multi-byte descriptions such as
/// `"pão de açú"` are accepted.
pub fn validate(request: &TransactionRequest) -> Result<TransactionIntent, LedgerError> {
    let description = match request.description.as_deref() {
        Some(description) if !description.is_empty() => description,
        _ => return Err(LedgerError::InvalidDescription),
    };

    let length = description.chars().count();
    if length > MAX_DESCRIPTION_CHARS {
        return Err(LedgerError::invalid_description_length(length));
    }

    if request.value <= 0 {
        return Err(LedgerError::invalid_value(request.value));
    }

    let tx_type = request.tx_type.parse::<TransactionType>()?;

    Ok(TransactionIntent {
        value: request.value,
        tx_type,
        description: description.to_string(),
    })
}
