//! Asynchronous CSV reader with batch interface
//!
//! Reads transaction requests from any `futures::io::AsyncRead` in batches,
//! using csv-async for streaming parsing. Malformed rows are logged and
//! skipped so one bad row never stops a replay.

use crate::core::RequestRecord;
use crate::io::csv_format::{convert_csv_record, CsvRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` request records
    ///
    /// Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<RequestRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(record) => batch.push(record),
                    Err(e) => warn!(error = %e, "Skipping malformed record"),
                },
                Some(Err(e)) => {
                    let line = e.position().map(|pos| pos.line());
                    warn!(error = %e, line, "CSV parse error");
                }
                None => break,
            }
        }

        batch
    }
}
