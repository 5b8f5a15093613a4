//! Index Searcher
//!
//! Binary search over the sorted index region, one range read per step.
//!
//! Each step's target depends on the previous step's decoded key, so reads
//! are strictly sequential. All search state lives on the stack of `find`:
//! dropping the future mid-read leaves nothing behind except fully read,
//! length-checked ranges in the read cache.

use std::cmp::Ordering;

use bytes::Bytes;

use crate::error::{FormatError, LookupError, Result};
use crate::format::{IndexRecord, Trailer};
use crate::source::RangeSource;

use super::RangeReader;

/// Searches the index of one blob
pub struct IndexSearcher<'r, 'a, S> {
    reader: &'r RangeReader<'a, S>,
    trailer: &'r Trailer,
    /// Windows of at most this many records are fetched in one read
    scan_threshold: u64,
}

impl<'r, 'a, S: RangeSource> IndexSearcher<'r, 'a, S> {
    pub fn new(reader: &'r RangeReader<'a, S>, trailer: &'r Trailer, scan_threshold: u64) -> Self {
        Self {
            reader,
            trailer,
            scan_threshold,
        }
    }

    /// Find the record whose key equals `key`.
    ///
    /// Issues at most `floor(log2(entry_count)) + 1` index reads, none when
    /// the index is empty.
    pub async fn find(&self, key: &[u8]) -> Result<Option<IndexRecord>> {
        let key_size = self.trailer.key_size;
        if key.len() != key_size as usize {
            return Err(LookupError::InvalidKey {
                expected: key_size,
                actual: key.len(),
            });
        }

        let mut low = 0u64;
        let mut high = self.trailer.entry_count;
        // Keys just outside [low, high); every key inside must sort between them
        let mut below: Option<Bytes> = None;
        let mut above: Option<Bytes> = None;

        while low < high {
            if self.scan_threshold > 1 && high - low <= self.scan_threshold {
                return self.scan_window(key, low, high, below, above).await;
            }

            let mid = low + (high - low) / 2;
            let record = self.fetch_record(mid).await?;
            check_order(&record.key, mid, below.as_ref(), above.as_ref())?;

            tracing::trace!("Search step: low={} mid={} high={}", low, mid, high);

            match record.key.as_ref().cmp(key) {
                Ordering::Equal => return Ok(Some(record)),
                Ordering::Less => {
                    low = mid + 1;
                    below = Some(record.key);
                }
                Ordering::Greater => {
                    high = mid;
                    above = Some(record.key);
                }
            }
        }

        Ok(None)
    }

    /// Read and decode the record at `position`
    async fn fetch_record(&self, position: u64) -> Result<IndexRecord> {
        let bytes = self
            .reader
            .read_cached(self.trailer.record_range(position))
            .await?;
        Ok(IndexRecord::decode(
            bytes,
            self.trailer.key_size as usize,
            position,
        )?)
    }

    /// Fetch records `[low, high)` with one read and finish the search in memory
    async fn scan_window(
        &self,
        key: &[u8],
        low: u64,
        high: u64,
        below: Option<Bytes>,
        above: Option<Bytes>,
    ) -> Result<Option<IndexRecord>> {
        tracing::trace!("Scanning window [{}, {})", low, high);

        let range = self.trailer.records_range(low, high);
        let expected = (range.end - range.start) as usize;
        let bytes = self.reader.read_cached(range).await?;
        if bytes.len() != expected {
            return Err(FormatError::TruncatedRecord {
                position: low,
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let key_size = self.trailer.key_size as usize;
        let record_size = self.trailer.record_size() as usize;
        let mut records = Vec::with_capacity((high - low) as usize);
        let mut previous = below;

        for (i, position) in (low..high).enumerate() {
            let chunk = bytes.slice(i * record_size..(i + 1) * record_size);
            let record = IndexRecord::decode(chunk, key_size, position)?;
            check_order(&record.key, position, previous.as_ref(), above.as_ref())?;
            previous = Some(record.key.clone());
            records.push(record);
        }

        Ok(records
            .binary_search_by(|r| r.key.as_ref().cmp(key))
            .ok()
            .map(|i| records.swap_remove(i)))
    }
}

/// A key at `position` must sort strictly between its window's neighbours
fn check_order(
    key: &[u8],
    position: u64,
    below: Option<&Bytes>,
    above: Option<&Bytes>,
) -> std::result::Result<(), FormatError> {
    let after_below = below.map_or(true, |b| b.as_ref() < key);
    let before_above = above.map_or(true, |a| key < a.as_ref());
    if after_below && before_above {
        return Ok(());
    }
    tracing::warn!("Index order violated at position {}", position);
    Err(FormatError::UnsortedIndex { position })
}
