//! Range Source Module
//!
//! The only I/O capability the lookup engine needs from a backing store.
//!
//! ## Contract
//! - `length()` returns the total blob length in bytes
//! - `read(start, end)` returns exactly `end - start` bytes, or fails
//! - A range that extends past the end of the blob is an error, never a
//!   silently shortened buffer
//!
//! Any store that can serve byte ranges (a local file, an in-memory buffer,
//! an HTTP object store) implements this trait; the engine is generic over it.

mod file;
mod memory;

use std::future::Future;
use std::io;
use std::sync::Arc;

use bytes::Bytes;

pub use file::FileSource;
pub use memory::MemorySource;

/// Byte-range access to an immutable blob
pub trait RangeSource: Send + Sync {
    /// Total length of the blob in bytes
    fn length(&self) -> impl Future<Output = io::Result<u64>> + Send;

    /// Read the half-open range `[start, end)`
    fn read(&self, start: u64, end: u64) -> impl Future<Output = io::Result<Bytes>> + Send;
}

impl<S: RangeSource> RangeSource for &S {
    fn length(&self) -> impl Future<Output = io::Result<u64>> + Send {
        (**self).length()
    }

    fn read(&self, start: u64, end: u64) -> impl Future<Output = io::Result<Bytes>> + Send {
        (**self).read(start, end)
    }
}

impl<S: RangeSource> RangeSource for Arc<S> {
    fn length(&self) -> impl Future<Output = io::Result<u64>> + Send {
        (**self).length()
    }

    fn read(&self, start: u64, end: u64) -> impl Future<Output = io::Result<Bytes>> + Send {
        (**self).read(start, end)
    }
}

/// Reject inverted ranges before touching the store
pub(crate) fn check_range(start: u64, end: u64) -> io::Result<()> {
    if end < start {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("inverted range [{}, {})", start, end),
        ));
    }
    Ok(())
}
