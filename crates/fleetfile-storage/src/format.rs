//! Store File Format
//!
//! This module defines the binary layout of a store file: the fixed header,
//! the length-prefixed block framing, and the format constants.
//!
//! ## File Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (24 bytes)                                           │
//! │ - Magic bytes: "FLTF" (4 bytes)                             │
//! │ - Version: 1 (4 bytes)                                      │
//! │ - Key count (8 bytes)                                       │
//! │ - Index offset (8 bytes)                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Schema block (written on first append)                      │
//! │ - Payload size (4 bytes)                                    │
//! │ - Encoded schema                                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Record block (one per append)                               │
//! │ - Payload size (4 bytes)                                    │
//! │ - Encoded record                                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │ ...                                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Index block (at index offset, rewritten on finalize)        │
//! │ - Payload size (4 bytes)                                    │
//! │ - Encoded key -> record offset map                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Block payloads are opaque to this
//! module; a [`ValueCodec`](fleetfile_core::ValueCodec) produces and
//! consumes them.
//!
//! ## Finalization
//!
//! A writer first stamps a placeholder header whose index offset is
//! [`INDEX_OFFSET_SENTINEL`]. Only when it finalizes does it write the
//! index block and rewrite the header with the real key count and index
//! offset. A file still carrying the sentinel was never finalized and its
//! contents past the header cannot be trusted.

use bytes::{Buf, BufMut};
use std::io::{ErrorKind, Read, Write};

use fleetfile_core::{Error, Result};

/// Magic bytes for store files: "FLTF"
pub const STORE_MAGIC: [u8; 4] = *b"FLTF";

/// Version number for the store format
pub const STORE_VERSION: u32 = 1;

/// Store header size (24 bytes)
pub const HEADER_SIZE: usize = 24;

/// Size of the length prefix framing every block (4 bytes)
pub const LEN_PREFIX_SIZE: usize = 4;

/// Index offset value marking a file that was never finalized
pub const INDEX_OFFSET_SENTINEL: u64 = u64::MAX;

/// Decoded store header
///
/// Magic and version are validated on read and fixed on write; only the
/// two mutable fields are carried around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Number of index entries, as of the last finalize
    pub key_count: u64,

    /// Byte offset of the index block, or [`INDEX_OFFSET_SENTINEL`]
    pub index_offset: u64,
}

impl FileHeader {
    /// Header for a file whose index has not been written yet
    pub fn placeholder(key_count: u64) -> Self {
        Self {
            key_count,
            index_offset: INDEX_OFFSET_SENTINEL,
        }
    }

    /// Whether the index offset points at a real index block
    pub fn is_finalized(&self) -> bool {
        self.index_offset != INDEX_OFFSET_SENTINEL
    }

    /// Encode to the fixed 24-byte wire form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let mut cursor = &mut buf[..];
        cursor.put_slice(&STORE_MAGIC);
        cursor.put_u32_le(STORE_VERSION);
        cursor.put_u64_le(self.key_count);
        cursor.put_u64_le(self.index_offset);
        buf
    }

    /// Decode and validate a 24-byte header
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut cursor = &buf[..];

        let mut magic = [0u8; 4];
        cursor.copy_to_slice(&mut magic);
        if magic != STORE_MAGIC {
            return Err(Error::FormatMismatch);
        }

        let version = cursor.get_u32_le();
        if version != STORE_VERSION {
            return Err(Error::VersionMismatch(version));
        }

        let key_count = cursor.get_u64_le();
        let index_offset = cursor.get_u64_le();
        Ok(Self {
            key_count,
            index_offset,
        })
    }

    /// Read and validate a header from the current position of `r`.
    ///
    /// A handle that ends before a full header is not a store file at all,
    /// so a short read reports [`Error::FormatMismatch`] rather than a raw
    /// I/O error.
    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        r.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::FormatMismatch
            } else {
                Error::Io(e)
            }
        })?;
        Self::decode(&buf)
    }

    /// Write the header at the current position of `w`
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.encode())?;
        Ok(())
    }
}

/// Write one block: a `u32` payload size followed by the payload bytes
pub fn write_block<W: Write>(w: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(Error::InvalidStore(format!(
            "block payload of {} bytes exceeds the u32 length prefix",
            payload.len()
        )));
    }
    let mut prefix = [0u8; LEN_PREFIX_SIZE];
    (&mut prefix[..]).put_u32_le(payload.len() as u32);
    w.write_all(&prefix)?;
    w.write_all(payload)?;
    Ok(())
}

/// Read one block, returning the raw payload bytes.
///
/// `limit` caps the accepted payload size (normally the bytes remaining in
/// the file past the prefix) so a corrupt prefix cannot drive a giant
/// allocation.
pub fn read_block<R: Read>(r: &mut R, limit: u64) -> Result<Vec<u8>> {
    let mut prefix = [0u8; LEN_PREFIX_SIZE];
    r.read_exact(&mut prefix)?;
    let len = (&prefix[..]).get_u32_le() as u64;
    if len > limit {
        return Err(Error::InvalidStore(format!(
            "block payload of {} bytes runs past the {} bytes left in the file",
            len, limit
        )));
    }
    let mut payload = vec![0u8; len as usize];
    r.read_exact(&mut payload)?;
    Ok(payload)
}
