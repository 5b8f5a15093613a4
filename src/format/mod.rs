//! Blob Format Module
//!
//! Byte layout of an immutable sorted key-value blob.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Value Region [0, index_offset)                          │
//! │   raw value bytes, concatenated                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ Index Region (entry_count * record_size)                │
//! │   [Key: key_size][ValueOffset: u64][ValueLen: u32]      │
//! │   ... strictly sorted by key, unsigned byte order ...   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Trailer (40 bytes)                                      │
//! │   Magic (8) | Version: u32 | KeySize: u32               │
//! │   EntryCount: u64 | IndexOffset: u64                    │
//! │   CRC32 of previous 32 bytes (4) | Padding (4)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod builder;
mod record;
mod trailer;

pub use builder::BlobBuilder;
pub use record::IndexRecord;
pub use trailer::Trailer;

// =============================================================================
// Shared Constants (used by builder, trailer, record, lookup)
// =============================================================================

/// Magic bytes identifying a RangeKV blob
pub const MAGIC: &[u8; 8] = b"RANGEKV\0";

/// Current blob format version
pub const VERSION: u32 = 1;

/// Trailer size: Magic (8) + Version (4) + KeySize (4) + EntryCount (8)
/// + IndexOffset (8) + CRC (4) + Padding (4) = 40 bytes
pub const TRAILER_SIZE: u64 = 40;

/// Bytes covered by the trailer checksum
pub(crate) const TRAILER_CHECKSUMMED: usize = 32;

/// Fixed part of an index record after the key: ValueOffset (8) + ValueLen (4)
pub const RECORD_SUFFIX_SIZE: u64 = 12;
