//! # RangeKV
//!
//! Point lookups into an immutable, sorted key-value blob without loading it:
//! - Fixed-size keys, sorted index, fixed-size trailer at the tail
//! - Only two I/O operations needed from the store: `length` and `read(start, end)`
//! - Binary search costing `O(log n)` range reads, with an index read cache
//! - Works over any store that serves byte ranges (file, memory, object store)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     LookupEngine                             │
//! │              lookup_key(key) -> Option<Bytes>                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!      ┌────────────────┼─────────────────┐
//!      ▼                ▼                 ▼
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │ Trailer  │   │    Index    │   │    Value    │
//! │  Loader  │   │  Searcher   │   │   Fetcher   │
//! │  (once)  │   │ (log n I/O) │   │  (one I/O)  │
//! └────┬─────┘   └──────┬──────┘   └──────┬──────┘
//!      └────────────────┼─────────────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │  RangeSource  │
//!               │ length / read │
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use rangekv::{BlobBuilder, LookupEngine, MemorySource};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut builder = BlobBuilder::new(4).unwrap();
//! builder.add(&b"key1"[..], &b"hello"[..]).unwrap();
//! let blob = builder.finish().unwrap();
//!
//! let engine = LookupEngine::new(MemorySource::new(blob));
//! let value = engine.lookup_key(b"key1").await.unwrap();
//! assert_eq!(value.as_deref(), Some(&b"hello"[..]));
//! # });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod source;
pub(crate) mod lookup;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use engine::LookupEngine;
pub use error::{BuildError, FormatError, LookupError, Result};
pub use format::{BlobBuilder, IndexRecord, Trailer};
pub use lookup::EngineStats;
pub use source::{FileSource, MemorySource, RangeSource};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RangeKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
