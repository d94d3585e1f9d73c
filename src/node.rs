use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::block_io::BLOCK_SIZE;

//-------------------------------------------------------------------------

/// Minimum degree. A node holds between `T - 1` and `2 * T - 1` keys,
/// except the root, which may hold as few as one.
pub const T: usize = 10;
pub const MAX_KEYS: usize = 2 * T - 1;
pub const MIN_KEYS: usize = T - 1;
pub const MAX_CHILDREN: usize = 2 * T;

const NODE_HEADER_SIZE: usize = 24; // own id + parent id + n, all u64
const KEYS_SIZE: usize = MAX_KEYS * 8;
const VALUES_SIZE: usize = MAX_KEYS * 8;
const CHILDREN_SIZE: usize = MAX_CHILDREN * 8;
const RESERVED_SIZE: usize =
    BLOCK_SIZE - NODE_HEADER_SIZE - KEYS_SIZE - VALUES_SIZE - CHILDREN_SIZE;

const KEYS_OFFSET: usize = NODE_HEADER_SIZE;
const VALUES_OFFSET: usize = KEYS_OFFSET + KEYS_SIZE;
const CHILDREN_OFFSET: usize = VALUES_OFFSET + VALUES_SIZE;

/// An in-memory B-tree node, one block's worth. Slots at or beyond `n`
/// (keys/values) or `n + 1` (children) carry no meaning and are kept
/// zeroed so the on-disk image of a given logical state is unique.
#[derive(Clone, Debug)]
pub struct Node {
    pub block_id: u64,
    pub parent_id: u64,
    pub n: usize,
    pub keys: [u64; MAX_KEYS],
    pub values: [u64; MAX_KEYS],
    pub children: [u64; MAX_CHILDREN],
}

impl Node {
    /// A freshly allocated, empty node with the given block identifier.
    pub fn new(block_id: u64) -> Self {
        Self {
            block_id,
            parent_id: 0,
            n: 0,
            keys: [0; MAX_KEYS],
            values: [0; MAX_KEYS],
            children: [0; MAX_CHILDREN],
        }
    }

    /// A non-leaf node must have a nonzero `children[0]`; a leaf has none.
    pub fn is_leaf(&self) -> bool {
        self.children[0] == 0
    }

    pub fn is_full(&self) -> bool {
        self.n == MAX_KEYS
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut buf = [0u8; BLOCK_SIZE];
        let mut w = Cursor::new(&mut buf[..]);
        w.write_u64::<BigEndian>(self.block_id).unwrap();
        w.write_u64::<BigEndian>(self.parent_id).unwrap();
        w.write_u64::<BigEndian>(self.n as u64).unwrap();
        for k in &self.keys {
            w.write_u64::<BigEndian>(*k).unwrap();
        }
        for v in &self.values {
            w.write_u64::<BigEndian>(*v).unwrap();
        }
        for c in &self.children {
            w.write_u64::<BigEndian>(*c).unwrap();
        }
        // Reserved tail bytes stay zero-filled.
        let _ = RESERVED_SIZE;
        buf
    }

    pub fn from_bytes(buf: &[u8; BLOCK_SIZE]) -> Self {
        let mut r = Cursor::new(&buf[..]);
        let block_id = r.read_u64::<BigEndian>().unwrap();
        let parent_id = r.read_u64::<BigEndian>().unwrap();
        let n = r.read_u64::<BigEndian>().unwrap() as usize;

        let mut keys = [0u64; MAX_KEYS];
        for k in keys.iter_mut() {
            *k = r.read_u64::<BigEndian>().unwrap();
        }

        let mut values = [0u64; MAX_KEYS];
        for v in values.iter_mut() {
            *v = r.read_u64::<BigEndian>().unwrap();
        }

        let mut children = [0u64; MAX_CHILDREN];
        for c in children.iter_mut() {
            *c = r.read_u64::<BigEndian>().unwrap();
        }

        Self {
            block_id,
            parent_id,
            n,
            keys,
            values,
            children,
        }
    }
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_spec_layout() {
        assert_eq!(KEYS_OFFSET, 24);
        assert_eq!(VALUES_OFFSET, 176);
        assert_eq!(CHILDREN_OFFSET, 328);
        assert_eq!(CHILDREN_OFFSET + CHILDREN_SIZE, 488);
        assert_eq!(RESERVED_SIZE, 24);
    }

    #[test]
    fn round_trips_through_bytes() {
        let mut node = Node::new(1);
        node.parent_id = 0;
        node.n = 1;
        node.keys[0] = 42;
        node.values[0] = 100;

        let bytes = node.to_bytes();
        let back = Node::from_bytes(&bytes);

        assert_eq!(back.block_id, 1);
        assert_eq!(back.parent_id, 0);
        assert_eq!(back.n, 1);
        assert_eq!(back.keys[0], 42);
        assert_eq!(back.values[0], 100);
        assert!(back.is_leaf());
    }

    #[test]
    fn fresh_node_matches_s2_layout() {
        let mut node = Node::new(1);
        node.n = 1;
        node.keys[0] = 42;
        node.values[0] = 100;
        let bytes = node.to_bytes();

        assert_eq!(&bytes[0..8], &1u64.to_be_bytes());
        assert_eq!(&bytes[8..16], &0u64.to_be_bytes());
        assert_eq!(&bytes[16..24], &1u64.to_be_bytes());
        assert_eq!(&bytes[24..32], &42u64.to_be_bytes());
        assert_eq!(&bytes[176..184], &100u64.to_be_bytes());
        assert!(bytes[32..176].iter().all(|&b| b == 0));
        assert!(bytes[184..].iter().all(|&b| b == 0));
    }

    #[test]
    fn non_leaf_has_nonzero_first_child() {
        let mut node = Node::new(5);
        node.children[0] = 2;
        assert!(!node.is_leaf());
    }
}

//-------------------------------------------------------------------------
