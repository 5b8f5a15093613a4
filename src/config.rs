//! Configuration for RangeKV
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a lookup engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Read Cache Configuration
    // -------------------------------------------------------------------------
    /// Max number of index ranges kept in the read cache (0 disables it)
    pub read_cache_capacity: usize,

    // -------------------------------------------------------------------------
    // Search Configuration
    // -------------------------------------------------------------------------
    /// Once the search window holds at most this many records, fetch the
    /// whole window in one read and finish in memory.
    /// 0 or 1 means strict record-at-a-time binary search.
    pub scan_threshold: u64,

    // -------------------------------------------------------------------------
    // Trailer Validation
    // -------------------------------------------------------------------------
    /// Largest key size accepted from a trailer (in bytes)
    pub max_key_size: u32,

    /// If set, the blob must declare exactly this key size
    pub expected_key_size: Option<u32>,

    /// Check the trailer CRC32
    pub verify_trailer_checksum: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_cache_capacity: 4096,
            scan_threshold: 8,
            max_key_size: 1024,
            expected_key_size: None,
            verify_trailer_checksum: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the read cache capacity (in cached ranges)
    pub fn read_cache_capacity(mut self, entries: usize) -> Self {
        self.config.read_cache_capacity = entries;
        self
    }

    /// Disable the read cache
    pub fn disable_read_cache(mut self) -> Self {
        self.config.read_cache_capacity = 0;
        self
    }

    /// Set the window size (in records) below which the search batches reads
    pub fn scan_threshold(mut self, records: u64) -> Self {
        self.config.scan_threshold = records;
        self
    }

    /// Set the largest accepted key size
    pub fn max_key_size(mut self, bytes: u32) -> Self {
        self.config.max_key_size = bytes;
        self
    }

    /// Require the blob to use this key size
    pub fn expected_key_size(mut self, bytes: u32) -> Self {
        self.config.expected_key_size = Some(bytes);
        self
    }

    /// Enable or disable trailer checksum verification
    pub fn verify_trailer_checksum(mut self, verify: bool) -> Self {
        self.config.verify_trailer_checksum = verify;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
