use tracing::trace;

use crate::alloc::NodeAlloc;
use crate::error::Result;
use crate::node::{Node, MAX_CHILDREN, MAX_KEYS, T};

//-------------------------------------------------------------------------

/// Splits the full child at `parent.children[index]` in place.
///
/// Peak residency here is exactly three nodes: `parent` (held by the
/// caller across the call), `child` (read at the top, dropped once its
/// surviving half and the promoted median have been extracted), and the
/// newly allocated sibling `z`. Relinking a non-leaf child's migrated
/// grandchildren briefly pulls in a fourth block, one at a time, per the
/// spec's explicit exception for that step.
pub fn split_child(alloc: &mut NodeAlloc, parent: &mut Node, index: usize) -> Result<()> {
    let child_id = parent.children[index];
    let mut child = alloc.read(child_id)?;
    debug_assert!(child.is_full());

    let mut z = alloc.allocate()?;
    let leaf = child.is_leaf();

    // z takes child's keys/values at t..2t-2 (9 entries).
    for j in 0..(T - 1) {
        z.keys[j] = child.keys[T + j];
        z.values[j] = child.values[T + j];
        child.keys[T + j] = 0;
        child.values[T + j] = 0;
    }
    z.n = T - 1;

    // z also takes child's children at t..2t-1 (10 entries) when child is
    // internal, relinking each migrated grandchild's parent pointer one
    // block at a time.
    if !leaf {
        for j in 0..T {
            let moved = child.children[T + j];
            z.children[j] = moved;
            child.children[T + j] = 0;
            if moved != 0 {
                let mut grandchild = alloc.read(moved)?;
                grandchild.parent_id = z.block_id;
                alloc.write(&grandchild)?;
            }
        }
    }

    let median_key = child.keys[T - 1];
    let median_value = child.values[T - 1];
    child.keys[T - 1] = 0;
    child.values[T - 1] = 0;
    child.n = T - 1;

    z.parent_id = parent.block_id;

    // Make room in parent for the new child pointer and the median.
    for j in (index + 1..=parent.n).rev() {
        debug_assert!(j + 1 < MAX_CHILDREN);
        parent.children[j + 1] = parent.children[j];
    }
    parent.children[index + 1] = z.block_id;

    for j in (index..parent.n).rev() {
        debug_assert!(j + 1 < MAX_KEYS);
        parent.keys[j + 1] = parent.keys[j];
        parent.values[j + 1] = parent.values[j];
    }
    parent.keys[index] = median_key;
    parent.values[index] = median_value;
    parent.n += 1;

    // Commit order matters: the shrunken child, then the sibling, then
    // the parent. The parent write is what makes the split observable.
    alloc.write(&child)?;
    alloc.write(&z)?;
    alloc.write(parent)?;

    trace!(
        child = child.block_id,
        sibling = z.block_id,
        parent = parent.block_id,
        median = median_key,
        "split full child"
    );

    Ok(())
}

//-------------------------------------------------------------------------
