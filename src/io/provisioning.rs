//! Client provisioning
//!
//! Clients are created before any transaction is applied and never change
//! name or limit afterwards. They come either from a CSV file with columns
//! `client,name,limit` or from the built-in default set.

use crate::types::{Client, ClientId, LedgerError};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// One row of a client provisioning file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientCsvRecord {
    pub client: ClientId,
    pub name: String,
    pub limit: i64,
}

/// The five clients every fresh ledger starts with unless told otherwise
pub fn default_clients() -> Vec<Client> {
    vec![
        Client::new(1, "o barato sai caro", 100_000),
        Client::new(2, "zan corp ltda", 80_000),
        Client::new(3, "les cruders", 1_000_000),
        Client::new(4, "padaria joia de cocaia", 10_000_000),
        Client::new(5, "kid mais", 500_000),
    ]
}

/// Load clients from a provisioning CSV file
///
/// Any malformed row aborts the load: a partially provisioned ledger would
/// silently reject transactions for the missing clients.
///
/// # Errors
///
/// * `FileNotFound` if the path does not exist
/// * `ParseError` for malformed rows, a zero client ID, a negative limit or
///   a duplicated client ID
pub fn load_clients(path: &Path) -> Result<Vec<Client>, LedgerError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LedgerError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LedgerError::from(e),
    })?;

    read_clients(file)
}

/// Parse and validate client rows from any reader
pub fn read_clients<R: Read>(input: R) -> Result<Vec<Client>, LedgerError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let mut seen = HashSet::new();
    let mut clients = Vec::new();

    for (index, row) in reader.deserialize::<ClientCsvRecord>().enumerate() {
        let row = row?;
        // Header is line 1
        let line = Some(index as u64 + 2);

        if row.client == 0 {
            return Err(LedgerError::ParseError {
                line,
                message: "Client ID must be positive".to_string(),
            });
        }
        if row.limit < 0 {
            return Err(LedgerError::ParseError {
                line,
                message: format!("Negative limit {} for client {}", row.limit, row.client),
            });
        }
        if !seen.insert(row.client) {
            return Err(LedgerError::ParseError {
                line,
                message: format!("Duplicate client {}", row.client),
            });
        }

        clients.push(Client::new(row.client, row.name, row.limit));
    }

    Ok(clients)
}
