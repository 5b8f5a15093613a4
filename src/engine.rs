//! Engine Module
//!
//! The lookup engine that coordinates all read-path components.
//!
//! ## Responsibilities
//! - Load the trailer once per blob and share it between callers
//! - Route each lookup through search and value fetch
//! - Own the read cache and I/O counters
//! - Keep no per-call state, so a failed call leaves the engine usable

use bytes::Bytes;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::error::{FormatError, LookupError, Result};
use crate::format::{IndexRecord, Trailer};
use crate::lookup::{
    EngineStats, IndexSearcher, RangeReader, ReadCache, StatsCounters, TrailerLoader, ValueFetcher,
};
use crate::source::RangeSource;

/// Point-lookup engine bound to one immutable blob
///
/// ## Concurrency Model
///
/// - `lookup_key` takes `&self`; any number of calls may run concurrently
///   and interleave freely
/// - Within one call, reads are issued strictly one after another
/// - **Trailer**: initialised at most once behind a `OnceCell`; concurrent
///   first callers wait on the same load instead of racing
/// - **Read cache**: internal RwLock, entries never invalidated
///
/// ## Construction
///
/// Construction performs no I/O. The trailer is read lazily by the first
/// call that needs it (`lookup_key`, `find_record` or `trailer`).
///
/// ## Trailer failures
///
/// A trailer that fails validation is remembered: every later call returns
/// the same [`FormatError`] without issuing reads. An I/O failure while
/// loading is not remembered, so the next call tries again.
pub struct LookupEngine<S> {
    /// Backing store
    source: S,

    /// Engine configuration
    config: Config,

    /// Trailer, or the format error it failed with
    trailer: OnceCell<std::result::Result<Trailer, FormatError>>,

    /// Index ranges read so far
    cache: ReadCache,

    /// I/O counters
    stats: StatsCounters,
}

impl<S: RangeSource> LookupEngine<S> {
    /// Bind an engine to `source` with default config
    pub fn new(source: S) -> Self {
        Self::with_config(source, Config::default())
    }

    /// Bind an engine to `source`
    pub fn with_config(source: S, config: Config) -> Self {
        Self {
            cache: ReadCache::new(config.read_cache_capacity),
            source,
            config,
            trailer: OnceCell::new(),
            stats: StatsCounters::default(),
        }
    }

    fn reader(&self) -> RangeReader<'_, S> {
        RangeReader::new(&self.source, &self.cache, &self.stats)
    }

    /// Get the blob trailer, loading it on first use
    pub async fn trailer(&self) -> Result<Trailer> {
        let loaded = self
            .trailer
            .get_or_try_init(|| async {
                let reader = self.reader();
                match TrailerLoader::new(&reader, &self.config).load_trailer().await {
                    Ok(trailer) => Ok(Ok(trailer)),
                    // The blob is immutable: a bad trailer stays bad
                    Err(LookupError::Format(e)) => Ok(Err(e)),
                    Err(e) => Err(e),
                }
            })
            .await?;

        loaded.clone().map_err(LookupError::from)
    }

    /// Find the index record for `key` without fetching its value
    pub async fn find_record(&self, key: &[u8]) -> Result<Option<IndexRecord>> {
        let trailer = self.trailer().await?;
        let reader = self.reader();
        IndexSearcher::new(&reader, &trailer, self.config.scan_threshold)
            .find(key)
            .await
    }

    /// Look up the value stored under `key`
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key present
    /// - `Ok(None)`: key absent (not an error)
    /// - `Err(_)`: I/O failure, corrupt blob, or a key of the wrong length
    pub async fn lookup_key(&self, key: &[u8]) -> Result<Option<Bytes>> {
        StatsCounters::bump(&self.stats.lookups, 1);

        let trailer = self.trailer().await?;
        let reader = self.reader();

        let record = match IndexSearcher::new(&reader, &trailer, self.config.scan_threshold)
            .find(key)
            .await?
        {
            Some(record) => record,
            None => {
                tracing::debug!("Key {} not found", hex::encode(key));
                return Ok(None);
            }
        };

        let value = ValueFetcher::new(&reader, &trailer)
            .fetch_value(&record)
            .await?;

        StatsCounters::bump(&self.stats.found, 1);
        tracing::debug!("Key {} found: {} bytes", hex::encode(key), value.len());

        Ok(Some(value))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the range source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the I/O counters
    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    /// Number of index ranges held by the read cache
    pub fn cached_ranges(&self) -> usize {
        self.cache.len()
    }
}
