//! Blob Builder
//!
//! Collects key-value pairs and writes a complete blob: values, sorted index,
//! trailer. Pairs can be added in any order; keys are sorted on write.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use bytes::{Bytes, BytesMut};

use crate::error::BuildError;

use super::{IndexRecord, Trailer, RECORD_SUFFIX_SIZE};

/// Builder for immutable sorted blobs
#[derive(Debug)]
pub struct BlobBuilder {
    /// Bytes per key
    key_size: u32,
    /// Pending entries, kept sorted by key
    entries: BTreeMap<Bytes, Bytes>,
    /// Running size of the value region
    value_bytes: u64,
}

impl BlobBuilder {
    /// Create a builder for keys of `key_size` bytes
    pub fn new(key_size: u32) -> Result<Self, BuildError> {
        if key_size == 0 {
            return Err(BuildError::UnsupportedKeySize(key_size));
        }
        Ok(Self {
            key_size,
            entries: BTreeMap::new(),
            value_bytes: 0,
        })
    }

    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a key-value pair. Duplicate keys are rejected.
    pub fn add(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<(), BuildError> {
        let key = key.into();
        let value = value.into();

        if key.len() != self.key_size as usize {
            return Err(BuildError::KeySize {
                expected: self.key_size,
                actual: key.len(),
            });
        }
        if value.len() > u32::MAX as usize {
            return Err(BuildError::TooLarge(format!(
                "value of {} bytes exceeds u32 length field",
                value.len()
            )));
        }

        let value_len = value.len() as u64;
        match self.entries.entry(key) {
            Entry::Occupied(e) => Err(BuildError::DuplicateKey(hex::encode(e.key()))),
            Entry::Vacant(e) => {
                e.insert(value);
                self.value_bytes += value_len;
                Ok(())
            }
        }
    }

    /// Write the blob to `writer`, returning the trailer that was written
    pub fn write_to<W: Write>(self, mut writer: W) -> Result<Trailer, BuildError> {
        let record_size = self.key_size as u64 + RECORD_SUFFIX_SIZE;
        let mut index = BytesMut::with_capacity(self.entries.len() * record_size as usize);

        // Values first, in key order, so the index offsets are ascending too
        let mut offset = 0u64;
        for (key, value) in &self.entries {
            writer.write_all(value)?;
            IndexRecord::new(key.clone(), offset, value.len() as u32).encode_into(&mut index);
            offset += value.len() as u64;
        }

        let trailer = Trailer::new(self.key_size, self.entries.len() as u64, offset);
        writer.write_all(&index)?;
        writer.write_all(&trailer.encode())?;
        writer.flush()?;

        tracing::debug!(
            "Wrote blob: {} entries, {} value bytes, key_size={}",
            trailer.entry_count,
            self.value_bytes,
            self.key_size
        );

        Ok(trailer)
    }

    /// Build the blob in memory
    pub fn finish(self) -> Result<Bytes, BuildError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(Bytes::from(out))
    }

    /// Write the blob to a file, replacing any existing content
    pub fn write_file(self, path: &Path) -> Result<Trailer, BuildError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        let trailer = self.write_to(&mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| BuildError::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(trailer)
    }
}
