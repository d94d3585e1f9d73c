use crate::block_io::BlockFile;
use crate::error::{IndexError, Result};
use crate::node::Node;

//-------------------------------------------------------------------------

/// One node on the in-order walk, together with where we are in its
/// interleaving of children and keys. For a node with `n` keys the events
/// are `child(0), key(0), child(1), key(1), ..., key(n-1), child(n)`, so
/// `pos` ranges over `0..=2n`: even positions are child visits, odd
/// positions are key emissions.
struct Frame {
    node: Node,
    pos: usize,
}

/// A lazy, finite, ascending-order iterator over the tree's `(key,
/// value)` pairs. Holds an explicit stack of ancestor frames — O(height)
/// resident nodes, the one place the engine is allowed to exceed the
/// three-node residency bound used by search and insert.
pub struct InOrderIter<'a> {
    file: &'a mut BlockFile,
    stack: Vec<Frame>,
}

impl<'a> InOrderIter<'a> {
    pub fn new(file: &'a mut BlockFile, root_id: u64) -> Result<Self> {
        let mut stack = Vec::new();
        if root_id != 0 {
            let buf = file.read_block(root_id)?;
            stack.push(Frame {
                node: Node::from_bytes(&buf),
                pos: 0,
            });
        }
        Ok(Self { file, stack })
    }

    fn read(&mut self, id: u64) -> Result<Node> {
        if id == 0 {
            return Err(IndexError::BadFormat(
                "attempted to traverse into a zero child pointer".to_string(),
            ));
        }
        let buf = self.file.read_block(id)?;
        Ok(Node::from_bytes(&buf))
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = Result<(u64, u64)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;

            if top.pos > 2 * top.node.n {
                self.stack.pop();
                continue;
            }

            if top.pos % 2 == 0 {
                let child_idx = top.pos / 2;
                top.pos += 1;
                let child_id = top.node.children[child_idx];
                if child_id != 0 {
                    match self.read(child_id) {
                        Ok(node) => self.stack.push(Frame { node, pos: 0 }),
                        Err(e) => return Some(Err(e)),
                    }
                }
            } else {
                let key_idx = (top.pos - 1) / 2;
                top.pos += 1;
                let pair = (top.node.keys[key_idx], top.node.values[key_idx]);
                return Some(Ok(pair));
            }
        }
    }
}

//-------------------------------------------------------------------------
