//! File-backed range source
//!
//! Seeks and reads a local file under a mutex. Every file operation runs on
//! tokio's blocking pool so a slow disk never stalls the async workers.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use super::{check_range, RangeSource};

/// A blob stored in a local file
#[derive(Debug)]
pub struct FileSource {
    /// File handle; seek + read must happen under one lock
    file: Arc<Mutex<File>>,
}

impl FileSource {
    /// Open a blob file for reading
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    async fn on_blocking_pool<T, F>(&self, op: F) -> io::Result<T>
    where
        F: FnOnce(&mut File) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || op(&mut file.lock()))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }
}

fn read_range(file: &mut File, start: u64, end: u64) -> io::Result<Bytes> {
    let len = file.metadata()?.len();
    if end > len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("range [{}, {}) past end of {}-byte blob", start, end, len),
        ));
    }

    let mut buf = BytesMut::zeroed((end - start) as usize);
    file.seek(SeekFrom::Start(start))?;
    file.read_exact(&mut buf)?;
    Ok(buf.freeze())
}

impl RangeSource for FileSource {
    async fn length(&self) -> io::Result<u64> {
        self.on_blocking_pool(|file| Ok(file.metadata()?.len())).await
    }

    async fn read(&self, start: u64, end: u64) -> io::Result<Bytes> {
        check_range(start, end)?;
        self.on_blocking_pool(move |file| read_range(file, start, end))
            .await
    }
}
