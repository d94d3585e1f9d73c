use crate::alloc::NodeAlloc;
use crate::error::{IndexError, Result};

//-------------------------------------------------------------------------

/// Searches for `key` starting from `root_id`, holding at most one node
/// resident at a time: each iteration loads a child and drops its parent.
pub fn search(alloc: &mut NodeAlloc, root_id: u64, key: u64) -> Result<Option<(u64, u64)>> {
    if root_id == 0 {
        return Ok(None);
    }

    let mut node = alloc.read(root_id)?;
    loop {
        let mut i = 0;
        while i < node.n && key > node.keys[i] {
            i += 1;
        }

        if i < node.n && node.keys[i] == key {
            return Ok(Some((node.keys[i], node.values[i])));
        }

        if node.is_leaf() {
            return Ok(None);
        }

        let child_id = node.children[i];
        if child_id == 0 {
            // A well-formed non-leaf must have a live child pointer up to
            // index n. This is a corrupt-file condition, not a miss.
            return Err(IndexError::BadFormat(format!(
                "non-leaf block {} has a zero child pointer at index {}",
                node.block_id, i
            )));
        }

        node = alloc.read(child_id)?;
    }
}

//-------------------------------------------------------------------------
