//! Value Fetcher
//!
//! Final read of a lookup: the value bytes a matched record points at.

use bytes::Bytes;

use crate::error::{FormatError, Result};
use crate::format::{IndexRecord, Trailer};
use crate::source::RangeSource;

use super::RangeReader;

/// Fetches values located by index records
pub struct ValueFetcher<'r, 'a, S> {
    reader: &'r RangeReader<'a, S>,
    trailer: &'r Trailer,
}

impl<'r, 'a, S: RangeSource> ValueFetcher<'r, 'a, S> {
    pub fn new(reader: &'r RangeReader<'a, S>, trailer: &'r Trailer) -> Self {
        Self { reader, trailer }
    }

    /// Read the value of `record`, returned opaque and uncached
    pub async fn fetch_value(&self, record: &IndexRecord) -> Result<Bytes> {
        let region_end = self.trailer.value_region_end();
        let range = record
            .value_range()
            .filter(|r| r.end <= region_end)
            .ok_or_else(|| {
                tracing::warn!(
                    "Value [{}, +{}) escapes value region of {} bytes",
                    record.value_offset,
                    record.value_length,
                    region_end
                );
                FormatError::ValueOutOfBounds {
                    offset: record.value_offset,
                    length: record.value_length,
                    region_end,
                }
            })?;

        if record.value_length == 0 {
            return Ok(Bytes::new());
        }

        let bytes = self.reader.read(range).await?;
        if bytes.len() != record.value_length as usize {
            return Err(FormatError::TruncatedValue {
                expected: record.value_length,
                actual: bytes.len(),
            }
            .into());
        }

        Ok(bytes)
    }
}
