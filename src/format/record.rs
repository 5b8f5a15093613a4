//! Index record encoding

use std::ops::Range;

use bytes::{Buf, BufMut, Bytes};

use crate::error::FormatError;

use super::RECORD_SUFFIX_SIZE;

/// One entry of the sorted index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Owned key bytes (never a view into a reused buffer)
    pub key: Bytes,
    /// Offset of the value within the blob
    pub value_offset: u64,
    /// Length of the value in bytes
    pub value_length: u32,
}

impl IndexRecord {
    pub fn new(key: impl Into<Bytes>, value_offset: u64, value_length: u32) -> Self {
        Self {
            key: key.into(),
            value_offset,
            value_length,
        }
    }

    /// Decode the record at index `position` from exactly one record's bytes
    pub fn decode(bytes: Bytes, key_size: usize, position: u64) -> Result<Self, FormatError> {
        let expected = key_size + RECORD_SUFFIX_SIZE as usize;
        if bytes.len() != expected {
            return Err(FormatError::TruncatedRecord {
                position,
                expected,
                actual: bytes.len(),
            });
        }

        let key = bytes.slice(..key_size);
        let mut suffix = &bytes[key_size..];
        let value_offset = suffix.get_u64_le();
        let value_length = suffix.get_u32_le();

        Ok(Self {
            key,
            value_offset,
            value_length,
        })
    }

    /// Append the on-disk form of this record
    pub fn encode_into(&self, out: &mut impl BufMut) {
        out.put_slice(&self.key);
        out.put_u64_le(self.value_offset);
        out.put_u32_le(self.value_length);
    }

    /// Byte range of the value, or None if it overflows u64
    pub fn value_range(&self) -> Option<Range<u64>> {
        let end = self.value_offset.checked_add(self.value_length as u64)?;
        Some(self.value_offset..end)
    }
}
