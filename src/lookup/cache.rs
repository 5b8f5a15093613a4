//! Read cache for index ranges
//!
//! The blob is immutable, so entries are never invalidated. Once the cache
//! reaches capacity it stops admitting new ranges.

use std::collections::HashMap;
use std::ops::Range;

use bytes::Bytes;
use parking_lot::RwLock;

/// Range → bytes map shared by concurrent lookups
#[derive(Debug)]
pub(crate) struct ReadCache {
    entries: RwLock<HashMap<(u64, u64), Bytes>>,
    capacity: usize,
}

impl ReadCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub(crate) fn get(&self, range: &Range<u64>) -> Option<Bytes> {
        if self.capacity == 0 {
            return None;
        }
        self.entries.read().get(&(range.start, range.end)).cloned()
    }

    pub(crate) fn insert(&self, range: Range<u64>, bytes: Bytes) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            return;
        }
        entries.entry((range.start, range.end)).or_insert(bytes);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
