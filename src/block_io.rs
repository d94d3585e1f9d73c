use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{IndexError, Result};

//-------------------------------------------------------------------------

/// Fixed size of every unit of file I/O: the header occupies block 0, nodes
/// occupy blocks 1, 2, ...
pub const BLOCK_SIZE: usize = 512;

/// A typed facade over a random-access byte file, putting a narrow layer
/// between raw file descriptors and everything above it. Every read and
/// write here moves exactly one `BLOCK_SIZE` block at an offset that is a
/// multiple of `BLOCK_SIZE`.
pub struct BlockFile {
    path: PathBuf,
    file: File,
}

impl BlockFile {
    /// Creates a fresh block file. Fails if `path` already exists so that
    /// `Index::create` never silently clobbers an existing index.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(IndexError::AlreadyExists(path));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self { path, file })
    }

    /// Opens an existing block file. Fails if `path` is missing; does not
    /// otherwise validate the contents (that's `Header::read`'s job).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(IndexError::NotFound(path));
        }

        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads block `id` in full. A short read (file truncated mid-block)
    /// is reported as a format error rather than a bare I/O error, since
    /// it indicates a malformed index rather than a transient failure.
    pub fn read_block(&mut self, id: u64) -> Result<[u8; BLOCK_SIZE]> {
        let mut buf = [0u8; BLOCK_SIZE];
        self.file.seek(SeekFrom::Start(id * BLOCK_SIZE as u64))?;
        self.file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IndexError::BadFormat(format!("block {id} is truncated"))
            } else {
                IndexError::Io(e)
            }
        })?;
        trace!(block = id, "read block");
        Ok(buf)
    }

    /// Writes block `id` and flushes it to storage before returning, so
    /// callers that issue dependent reads afterwards see durable state.
    pub fn write_block(&mut self, id: u64, data: &[u8; BLOCK_SIZE]) -> Result<()> {
        self.file.seek(SeekFrom::Start(id * BLOCK_SIZE as u64))?;
        self.file.write_all(data)?;
        self.file.sync_data()?;
        trace!(block = id, "wrote block");
        Ok(())
    }

    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

//-------------------------------------------------------------------------
