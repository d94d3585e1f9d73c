use tracing::debug;

use crate::block_io::BlockFile;
use crate::error::{IndexError, Result};
use crate::header::Header;
use crate::node::Node;

//-------------------------------------------------------------------------

/// Bundles the block file and the header together for the duration of one
/// engine call. Every node read/write and every block allocation goes
/// through here so the header's `next_block_id` and the underlying file
/// stay in lock step.
pub struct NodeAlloc<'a> {
    pub file: &'a mut BlockFile,
    pub header: &'a mut Header,
}

impl<'a> NodeAlloc<'a> {
    pub fn new(file: &'a mut BlockFile, header: &'a mut Header) -> Self {
        Self { file, header }
    }

    /// Hands out a fresh, empty node and persists the new high-water mark
    /// before returning. The node itself is not written until the caller
    /// populates and writes it.
    pub fn allocate(&mut self) -> Result<Node> {
        let id = self.header.next_block_id;
        self.header.next_block_id += 1;
        self.header.write(self.file)?;
        debug!(block = id, "allocated node block");
        Ok(Node::new(id))
    }

    pub fn read(&mut self, id: u64) -> Result<Node> {
        if id == 0 {
            return Err(IndexError::BadFormat(
                "attempted to read block 0 as a node".to_string(),
            ));
        }
        let buf = self.file.read_block(id)?;
        Ok(Node::from_bytes(&buf))
    }

    pub fn write(&mut self, node: &Node) -> Result<()> {
        self.file.write_block(node.block_id, &node.to_bytes())
    }

    pub fn set_root(&mut self, root_id: u64) -> Result<()> {
        self.header.root_id = root_id;
        self.header.write(self.file)
    }
}

//-------------------------------------------------------------------------
