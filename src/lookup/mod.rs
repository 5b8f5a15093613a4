//! Lookup Module
//!
//! The read path, split the way a lookup flows:
//!
//! ```text
//!   TrailerLoader ──► IndexSearcher ──► ValueFetcher
//!   (once per blob)   (O(log n) reads)  (one read)
//! ```
//!
//! Every component reads through a [`RangeReader`], which counts reads and
//! consults the shared [`ReadCache`] for index ranges.

mod cache;
mod search;
mod trailer;
mod value;

use std::io;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::source::RangeSource;

pub(crate) use cache::ReadCache;
pub use search::IndexSearcher;
pub use trailer::TrailerLoader;
pub use value::ValueFetcher;

// =============================================================================
// Statistics
// =============================================================================

/// Snapshot of engine I/O counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// `length()` calls issued to the source
    pub length_calls: u64,
    /// `read()` calls issued to the source (cache hits excluded)
    pub range_reads: u64,
    /// Bytes returned by the source
    pub bytes_read: u64,
    /// Index reads served from the read cache
    pub cache_hits: u64,
    /// Trailer reads issued
    pub trailer_loads: u64,
    /// `lookup_key` calls started
    pub lookups: u64,
    /// `lookup_key` calls that found their key
    pub found: u64,
}

/// Lock-free counters behind [`EngineStats`]
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) length_calls: AtomicU64,
    pub(crate) range_reads: AtomicU64,
    pub(crate) bytes_read: AtomicU64,
    pub(crate) cache_hits: AtomicU64,
    pub(crate) trailer_loads: AtomicU64,
    pub(crate) lookups: AtomicU64,
    pub(crate) found: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> EngineStats {
        EngineStats {
            length_calls: self.length_calls.load(Ordering::Relaxed),
            range_reads: self.range_reads.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            trailer_loads: self.trailer_loads.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Range Reader
// =============================================================================

/// Counting, optionally caching view of a range source
pub struct RangeReader<'a, S> {
    source: &'a S,
    cache: &'a ReadCache,
    stats: &'a StatsCounters,
}

impl<'a, S: RangeSource> RangeReader<'a, S> {
    pub(crate) fn new(source: &'a S, cache: &'a ReadCache, stats: &'a StatsCounters) -> Self {
        Self {
            source,
            cache,
            stats,
        }
    }

    /// Total blob length
    pub async fn length(&self) -> io::Result<u64> {
        StatsCounters::bump(&self.stats.length_calls, 1);
        self.source.length().await
    }

    /// Read a range straight from the source
    pub async fn read(&self, range: Range<u64>) -> io::Result<Bytes> {
        tracing::trace!("Range read [{}, {})", range.start, range.end);
        StatsCounters::bump(&self.stats.range_reads, 1);
        let bytes = self.source.read(range.start, range.end).await?;
        StatsCounters::bump(&self.stats.bytes_read, bytes.len() as u64);
        Ok(bytes)
    }

    /// Read a range, serving it from the cache when possible.
    ///
    /// Only complete reads are admitted to the cache.
    pub async fn read_cached(&self, range: Range<u64>) -> io::Result<Bytes> {
        if let Some(bytes) = self.cache.get(&range) {
            StatsCounters::bump(&self.stats.cache_hits, 1);
            return Ok(bytes);
        }

        let bytes = self.read(range.clone()).await?;
        if bytes.len() as u64 == range.end - range.start {
            self.cache.insert(range, bytes.clone());
        }
        Ok(bytes)
    }
}
