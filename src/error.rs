//! Error types for RangeKV
//!
//! Three families:
//! - [`LookupError`] is what every read-path operation returns.
//! - [`FormatError`] describes a blob whose bytes violate the layout.
//! - [`BuildError`] is returned by [`crate::format::BlobBuilder`].
//!
//! A missing key is not an error: lookups return `Ok(None)` for it.

use thiserror::Error;

/// Result type alias using LookupError
pub type Result<T> = std::result::Result<T, LookupError>;

/// Unified error type for lookup operations
#[derive(Debug, Error)]
pub enum LookupError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// The range source failed a `length` or `read` request.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Data Errors
    // -------------------------------------------------------------------------
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: u32, actual: usize },
}

impl LookupError {
    /// Returns the format error, if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            LookupError::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// Layout violations found while decoding a blob.
///
/// `Clone` so that a trailer that failed validation can be replayed to every
/// later caller without touching the source again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    // -------------------------------------------------------------------------
    // Trailer
    // -------------------------------------------------------------------------
    #[error("Invalid blob magic: got {found:?}")]
    BadMagic { found: [u8; 8] },

    #[error("Unsupported blob version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Trailer checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    TrailerChecksum { stored: u32, computed: u32 },

    #[error("Unsupported key size {key_size} (must be 1..={max})")]
    UnsupportedKeySize { key_size: u32, max: u32 },

    #[error("Key size mismatch: expected {expected}, blob declares {found}")]
    KeySizeMismatch { expected: u32, found: u32 },

    #[error("Truncated trailer: expected {expected} bytes, got {actual}")]
    TruncatedTrailer { expected: u64, actual: u64 },

    #[error("Trailer out of bounds: {0}")]
    TrailerOutOfBounds(String),

    // -------------------------------------------------------------------------
    // Index
    // -------------------------------------------------------------------------
    #[error("Truncated index record at position {position}: expected {expected} bytes, got {actual}")]
    TruncatedRecord {
        position: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Index is not strictly sorted at position {position}")]
    UnsortedIndex { position: u64 },

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------
    #[error("Truncated value: expected {expected} bytes, got {actual}")]
    TruncatedValue { expected: u32, actual: usize },

    #[error("Value [{offset}, +{length}) outside value region [0, {region_end})")]
    ValueOutOfBounds {
        offset: u64,
        length: u32,
        region_end: u64,
    },
}

/// Errors raised while writing a blob
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key size mismatch: expected {expected} bytes, got {actual}")]
    KeySize { expected: u32, actual: usize },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Blob too large: {0}")]
    TooLarge(String),

    #[error("Unsupported key size {0}")]
    UnsupportedKeySize(u32),
}
