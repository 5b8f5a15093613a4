//! Trailer Loader
//!
//! Learns the blob length and decodes the fixed-size trailer at its tail.

use crate::config::Config;
use crate::error::{FormatError, Result};
use crate::format::{Trailer, TRAILER_SIZE};
use crate::source::RangeSource;

use super::{RangeReader, StatsCounters};

/// Reads and validates a blob trailer
pub struct TrailerLoader<'r, 'a, S> {
    reader: &'r RangeReader<'a, S>,
    config: &'r Config,
}

impl<'r, 'a, S: RangeSource> TrailerLoader<'r, 'a, S> {
    pub fn new(reader: &'r RangeReader<'a, S>, config: &'r Config) -> Self {
        Self { reader, config }
    }

    /// One `length()` call and exactly one range read of the last
    /// [`TRAILER_SIZE`] bytes
    pub async fn load_trailer(&self) -> Result<Trailer> {
        let blob_len = self.reader.length().await?;
        if blob_len < TRAILER_SIZE {
            tracing::warn!("Blob of {} bytes is too small for a trailer", blob_len);
            return Err(FormatError::TruncatedTrailer {
                expected: TRAILER_SIZE,
                actual: blob_len,
            }
            .into());
        }

        let bytes = self.reader.read(blob_len - TRAILER_SIZE..blob_len).await?;
        StatsCounters::bump(&self.reader.stats.trailer_loads, 1);

        let trailer = Trailer::decode(&bytes, self.config.verify_trailer_checksum)
            .and_then(|t| t.validate(blob_len, self.config).map(|_| t))
            .map_err(|e| {
                tracing::warn!("Rejected blob trailer: {}", e);
                e
            })?;

        tracing::debug!(
            "Loaded trailer: {} entries, key_size={}, index_offset={}, blob_len={}",
            trailer.entry_count,
            trailer.key_size,
            trailer.index_offset,
            blob_len
        );

        Ok(trailer)
    }
}
