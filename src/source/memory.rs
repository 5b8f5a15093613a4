//! In-memory range source
//!
//! Serves ranges as zero-copy slices of a shared buffer.

use std::io;

use bytes::Bytes;

use super::{check_range, RangeSource};

/// A blob held entirely in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl RangeSource for MemorySource {
    async fn length(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    async fn read(&self, start: u64, end: u64) -> io::Result<Bytes> {
        check_range(start, end)?;
        if end > self.data.len() as u64 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "range [{}, {}) past end of {}-byte blob",
                    start,
                    end,
                    self.data.len()
                ),
            ));
        }
        Ok(self.data.slice(start as usize..end as usize))
    }
}
