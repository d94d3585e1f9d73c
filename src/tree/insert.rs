use tracing::debug;

use crate::alloc::NodeAlloc;
use crate::error::{IndexError, Result};
use crate::node::{Node, MAX_KEYS};
use crate::tree::split::split_child;

//-------------------------------------------------------------------------

/// Inserts `(key, value)`, splitting nodes on the way down so that any
/// recursive step always lands in a non-full node (the classical
/// proactive-split variant). Rejects the insert with `DuplicateKey` if
/// `key` is already present anywhere on the descent, without a separate
/// pre-insert lookup call.
pub fn insert(alloc: &mut NodeAlloc, key: u64, value: u64) -> Result<()> {
    if alloc.header.root_id == 0 {
        let mut root = alloc.allocate()?;
        root.n = 1;
        root.keys[0] = key;
        root.values[0] = value;
        alloc.write(&root)?;
        alloc.set_root(root.block_id)?;
        debug!(%key, %value, block = root.block_id, "created root leaf");
        return Ok(());
    }

    let mut root = alloc.read(alloc.header.root_id)?;
    if root.is_full() {
        let mut new_root = alloc.allocate()?;
        new_root.children[0] = root.block_id;
        root.parent_id = new_root.block_id;
        alloc.write(&root)?;
        alloc.set_root(new_root.block_id)?;

        split_child(alloc, &mut new_root, 0)?;
        debug!(block = new_root.block_id, "grew a new root");
        root = new_root;
    }

    insert_non_full(alloc, root, key, value)
}

/// Walks down from `node` (already known non-full), splitting the next
/// child before descending into it whenever that child is full. Iterative
/// rather than recursive: the loop reloads the working node from disk on
/// every iteration, so ancestor node bodies are never pinned across a
/// descent, only the current node and (fleetingly) its candidate child.
fn insert_non_full(alloc: &mut NodeAlloc, mut node: Node, key: u64, value: u64) -> Result<()> {
    loop {
        let mut i = 0;
        while i < node.n && key > node.keys[i] {
            i += 1;
        }
        if i < node.n && node.keys[i] == key {
            return Err(IndexError::DuplicateKey(key));
        }

        if node.is_leaf() {
            for j in (i..node.n).rev() {
                node.keys[j + 1] = node.keys[j];
                node.values[j + 1] = node.values[j];
            }
            node.keys[i] = key;
            node.values[i] = value;
            node.n += 1;
            alloc.write(&node)?;
            return Ok(());
        }

        let child_id = node.children[i];
        let child_full = {
            let child = alloc.read(child_id)?;
            child.n == MAX_KEYS
        };

        if child_full {
            split_child(alloc, &mut node, i)?;
            if key == node.keys[i] {
                return Err(IndexError::DuplicateKey(key));
            }
            if key > node.keys[i] {
                i += 1;
            }
        }

        node = alloc.read(node.children[i])?;
    }
}

//-------------------------------------------------------------------------
