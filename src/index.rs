use std::path::Path;

use tracing::info;

use crate::alloc::NodeAlloc;
use crate::block_io::BlockFile;
use crate::error::Result;
use crate::header::Header;
use crate::tree::traversal::InOrderIter;
use crate::tree::{insert, lookup};

//-------------------------------------------------------------------------

/// A handle onto an open index file. Owns the block file and the
/// in-memory copy of the header; every operation flushes whatever header
/// or node state it touches before returning, so the handle never lags
/// behind the file it wraps.
pub struct Index {
    file: BlockFile,
    header: Header,
}

impl Index {
    /// Creates a new, empty index at `path`. Fails if `path` already
    /// exists.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = BlockFile::create(path)?;
        let header = Header::empty();
        header.write(&mut file)?;
        info!("created empty index");
        Ok(Self { file, header })
    }

    /// Opens an existing index at `path`. Fails if the file is missing,
    /// truncated, or carries the wrong magic number.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = BlockFile::open(path)?;
        let header = Header::read(&mut file)?;
        info!(root = header.root_id, "opened index");
        Ok(Self { file, header })
    }

    fn alloc(&mut self) -> NodeAlloc<'_> {
        NodeAlloc::new(&mut self.file, &mut self.header)
    }

    /// Inserts `(key, value)`. Rejects an already-present key with
    /// `DuplicateKey`, leaving the tree unchanged.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<()> {
        insert::insert(&mut self.alloc(), key, value)
    }

    /// Looks up `key`, returning `(key, value)` on a hit.
    pub fn search(&mut self, key: u64) -> Result<Option<(u64, u64)>> {
        let root_id = self.header.root_id;
        lookup::search(&mut self.alloc(), root_id, key)
    }

    /// A lazy, ascending-order iterator over every `(key, value)` pair in
    /// the tree.
    pub fn iterate_in_order(&mut self) -> Result<InOrderIter<'_>> {
        InOrderIter::new(&mut self.file, self.header.root_id)
    }

    /// Closes the handle. All mutating calls already flush their own
    /// writes, so this exists to give callers an explicit, named place to
    /// release the handle rather than relying on `Drop`.
    pub fn close(self) {}

    /// Test-only escape hatch so the invariant-checking property tests in
    /// `tree::tests` can walk the on-disk structure directly.
    #[cfg(test)]
    pub(crate) fn with_alloc_for_test<F: FnOnce(&mut NodeAlloc, u64)>(&mut self, f: F) {
        let root_id = self.header.root_id;
        f(&mut self.alloc(), root_id)
    }
}

//-------------------------------------------------------------------------


//-------------------------------------------------------------------------
