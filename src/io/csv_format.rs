//! CSV format handling for transaction requests and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization of requests
//! - Conversion from CSV records to [`RequestRecord`]s
//! - Client summary and statement serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::RequestRecord;
use crate::types::{Client, ClientId, LedgerError, Statement, TransactionRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: client, type, value, description.
/// The value stays a string so a malformed number is reported with context,
/// and the description is optional so a missing one reaches the validator.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub client: ClientId,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub value: String,
    pub description: Option<String>,
}

/// Convert a CsvRecord to a RequestRecord
///
/// Only the value is interpreted here. Direction code, value sign and
/// description are left to the ledger's validator so that the CSV path and
/// direct callers are held to the same rules.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<RequestRecord, String> {
    let value = csv_record.value.trim();
    if value.is_empty() {
        return Err(format!(
            "{} transaction for client {} requires a value",
            csv_record.tx_type, csv_record.client
        ));
    }

    let value = value.parse::<i64>().map_err(|_| {
        format!(
            "Invalid value '{}' for client {}",
            csv_record.value, csv_record.client
        )
    })?;

    Ok(RequestRecord {
        client: csv_record.client,
        request: TransactionRequest {
            value,
            tx_type: csv_record.tx_type,
            description: csv_record.description,
        },
    })
}

fn write_error(context: &str, error: impl std::fmt::Display) -> LedgerError {
    LedgerError::IoError {
        message: format!("{}: {}", context, error),
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Write client summaries to CSV format
///
/// Columns: client, name, limit, balance. Sorted by client ID for
/// deterministic output.
pub fn write_clients_csv(clients: &[Client], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["client", "name", "limit", "balance"])
        .map_err(|e| write_error("Failed to write CSV header", e))?;

    let mut sorted_clients = clients.to_vec();
    sorted_clients.sort_by_key(|client| client.id);

    for client in sorted_clients {
        writer
            .write_record(&[
                client.id.to_string(),
                client.name,
                client.limit.to_string(),
                client.balance.to_string(),
            ])
            .map_err(|e| write_error("Failed to write client record", e))?;
    }

    writer
        .flush()
        .map_err(|e| write_error("Failed to flush output", e))?;

    Ok(())
}

/// Write statements to CSV format
///
/// One row per statement transaction, newest first within a client. A client
/// without transactions still gets one row, with the transaction columns empty.
pub fn write_statements_csv(
    statements: &[Statement],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "client",
            "balance",
            "limit",
            "as_of",
            "sequence",
            "type",
            "value",
            "description",
            "created_at",
        ])
        .map_err(|e| write_error("Failed to write CSV header", e))?;

    for statement in statements {
        let head = [
            statement.client.to_string(),
            statement.balance.to_string(),
            statement.limit.to_string(),
            format_timestamp(&statement.as_of),
        ];

        if statement.transactions.is_empty() {
            let row: Vec<String> = head
                .iter()
                .cloned()
                .chain(std::iter::repeat(String::new()).take(5))
                .collect();
            writer
                .write_record(&row)
                .map_err(|e| write_error("Failed to write statement record", e))?;
            continue;
        }

        for transaction in &statement.transactions {
            let row: Vec<String> = head
                .iter()
                .cloned()
                .chain([
                    transaction.sequence.to_string(),
                    transaction.tx_type.to_string(),
                    transaction.value.to_string(),
                    transaction.description.clone(),
                    format_timestamp(&transaction.created_at),
                ])
                .collect();
            writer
                .write_record(&row)
                .map_err(|e| write_error("Failed to write statement record", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| write_error("Failed to flush output", e))?;

    Ok(())
}
