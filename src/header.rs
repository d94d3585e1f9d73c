use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use crate::block_io::{BlockFile, BLOCK_SIZE};
use crate::error::{IndexError, Result};

//-------------------------------------------------------------------------

pub const MAGIC: &[u8; 8] = b"4348PRJ3";
pub const HEADER_BLOCK: u64 = 0;

/// Block 0 of the index file: the magic identifier, the root block, and
/// the allocator's high-water mark. Owned by the `Index` handle and kept
/// in memory between calls, flushed to disk on every change.
pub struct Header {
    pub root_id: u64,
    pub next_block_id: u64,
}

impl Header {
    pub fn empty() -> Self {
        Self {
            root_id: 0,
            next_block_id: 1,
        }
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut buf = [0u8; BLOCK_SIZE];
        let mut w = Cursor::new(&mut buf[..]);
        w.write_all(MAGIC).expect("header magic fits in block");
        w.write_u64::<BigEndian>(self.root_id).unwrap();
        w.write_u64::<BigEndian>(self.next_block_id).unwrap();
        // Remaining bytes stay zero-filled.
        buf
    }

    pub fn from_bytes(buf: &[u8; BLOCK_SIZE]) -> Result<Self> {
        let mut r = Cursor::new(&buf[..]);
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(IndexError::BadFormat(
                "magic number does not match 4348PRJ3".to_string(),
            ));
        }

        let root_id = r.read_u64::<BigEndian>()?;
        let next_block_id = r.read_u64::<BigEndian>()?;

        Ok(Self {
            root_id,
            next_block_id,
        })
    }

    pub fn read(file: &mut BlockFile) -> Result<Self> {
        if file.len()? < BLOCK_SIZE as u64 {
            return Err(IndexError::BadFormat(
                "index file is shorter than one block".to_string(),
            ));
        }
        let buf = file.read_block(HEADER_BLOCK)?;
        Self::from_bytes(&buf)
    }

    pub fn write(&self, file: &mut BlockFile) -> Result<()> {
        file.write_block(HEADER_BLOCK, &self.to_bytes())
    }
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let hdr = Header {
            root_id: 7,
            next_block_id: 42,
        };
        let bytes = hdr.to_bytes();
        assert_eq!(&bytes[0..8], MAGIC);

        let back = Header::from_bytes(&bytes).unwrap();
        assert_eq!(back.root_id, 7);
        assert_eq!(back.next_block_id, 42);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = [0u8; BLOCK_SIZE];
        buf[0..8].copy_from_slice(b"NOTMAGIC");
        assert!(matches!(
            Header::from_bytes(&buf),
            Err(IndexError::BadFormat(_))
        ));
    }

    #[test]
    fn empty_header_matches_s1_layout() {
        let hdr = Header::empty();
        let bytes = hdr.to_bytes();
        assert_eq!(&bytes[0..8], b"4348PRJ3");
        assert_eq!(&bytes[8..16], &[0u8; 8]);
        assert_eq!(&bytes[16..24], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(bytes[24..].iter().all(|&b| b == 0));
    }
}

//-------------------------------------------------------------------------
