//! Blob trailer
//!
//! Fixed-size footer that locates the index region.

use std::ops::Range;

use bytes::{Buf, BufMut};

use crate::config::Config;
use crate::error::FormatError;

use super::{MAGIC, RECORD_SUFFIX_SIZE, TRAILER_CHECKSUMMED, TRAILER_SIZE, VERSION};

/// Decoded trailer fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Format version the blob was written with
    pub version: u32,
    /// Bytes per key
    pub key_size: u32,
    /// Number of index records
    pub entry_count: u64,
    /// Start of the index region (also the end of the value region)
    pub index_offset: u64,
}

impl Trailer {
    /// Trailer for the current format version
    pub fn new(key_size: u32, entry_count: u64, index_offset: u64) -> Self {
        Self {
            version: VERSION,
            key_size,
            entry_count,
            index_offset,
        }
    }

    /// Size of one index record in bytes
    pub fn record_size(&self) -> u64 {
        self.key_size as u64 + RECORD_SUFFIX_SIZE
    }

    /// Size of the index region, or None on overflow
    pub fn index_len(&self) -> Option<u64> {
        self.entry_count.checked_mul(self.record_size())
    }

    /// End of the value region; values must lie in `[0, value_region_end)`
    pub fn value_region_end(&self) -> u64 {
        self.index_offset
    }

    /// Byte range of records `[low, high)`.
    ///
    /// Only meaningful on a validated trailer, where the whole index is known
    /// to fit without overflow.
    pub fn records_range(&self, low: u64, high: u64) -> Range<u64> {
        let record_size = self.record_size();
        let start = self.index_offset + low * record_size;
        let end = self.index_offset + high * record_size;
        start..end
    }

    /// Byte range of a single record
    pub fn record_range(&self, position: u64) -> Range<u64> {
        self.records_range(position, position + 1)
    }

    /// Encode to the on-disk layout
    pub fn encode(&self) -> [u8; TRAILER_SIZE as usize] {
        let mut out = [0u8; TRAILER_SIZE as usize];
        {
            let mut buf = &mut out[..];
            buf.put_slice(MAGIC);
            buf.put_u32_le(self.version);
            buf.put_u32_le(self.key_size);
            buf.put_u64_le(self.entry_count);
            buf.put_u64_le(self.index_offset);
        }
        let crc = crc32fast::hash(&out[..TRAILER_CHECKSUMMED]);
        (&mut out[TRAILER_CHECKSUMMED..]).put_u32_le(crc);
        // remaining 4 bytes stay zero (padding)
        out
    }

    /// Decode trailer bytes, checking magic, version and (optionally) CRC.
    ///
    /// Range checks against the blob happen in [`Trailer::validate`].
    pub fn decode(bytes: &[u8], verify_checksum: bool) -> Result<Self, FormatError> {
        if bytes.len() as u64 != TRAILER_SIZE {
            return Err(FormatError::TruncatedTrailer {
                expected: TRAILER_SIZE,
                actual: bytes.len() as u64,
            });
        }

        let mut buf = bytes;
        let mut magic = [0u8; 8];
        buf.copy_to_slice(&mut magic);
        if &magic != MAGIC {
            return Err(FormatError::BadMagic { found: magic });
        }

        let version = buf.get_u32_le();
        if version == 0 || version > VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: version,
                supported: VERSION,
            });
        }

        let key_size = buf.get_u32_le();
        let entry_count = buf.get_u64_le();
        let index_offset = buf.get_u64_le();
        let stored = buf.get_u32_le();

        if verify_checksum {
            let computed = crc32fast::hash(&bytes[..TRAILER_CHECKSUMMED]);
            if stored != computed {
                return Err(FormatError::TrailerChecksum { stored, computed });
            }
        }

        Ok(Self {
            version,
            key_size,
            entry_count,
            index_offset,
        })
    }

    /// Check key size policy and that the index fits in a blob of `blob_len` bytes
    pub fn validate(&self, blob_len: u64, config: &Config) -> Result<(), FormatError> {
        if self.key_size == 0 || self.key_size > config.max_key_size {
            return Err(FormatError::UnsupportedKeySize {
                key_size: self.key_size,
                max: config.max_key_size,
            });
        }

        if let Some(expected) = config.expected_key_size {
            if expected != self.key_size {
                return Err(FormatError::KeySizeMismatch {
                    expected,
                    found: self.key_size,
                });
            }
        }

        let index_len = self.index_len().ok_or_else(|| {
            FormatError::TrailerOutOfBounds(format!(
                "index size overflows: {} records of {} bytes",
                self.entry_count,
                self.record_size()
            ))
        })?;

        let required = self
            .index_offset
            .checked_add(index_len)
            .and_then(|end| end.checked_add(TRAILER_SIZE))
            .ok_or_else(|| {
                FormatError::TrailerOutOfBounds(format!(
                    "index end overflows: offset {} + {} bytes",
                    self.index_offset, index_len
                ))
            })?;

        if required > blob_len {
            return Err(FormatError::TrailerOutOfBounds(format!(
                "index [{}, +{}) and trailer need {} bytes, blob has {}",
                self.index_offset, index_len, required, blob_len
            )));
        }

        Ok(())
    }
}
