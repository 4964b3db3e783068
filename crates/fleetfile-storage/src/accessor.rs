//! Shared Store Access Plumbing
//!
//! Both `FileWriter` and `FileReader` run the same open sequence (validate
//! the header, then read the schema block if one exists) and the same
//! seek-and-read-block primitive. This module holds that shared state so
//! the two sides cannot drift apart on how a file is interpreted.

use std::io::{Read, Seek, SeekFrom};

use fleetfile_core::{Error, KeyIndex, Record, Result, Schema, ValueCodec};

use crate::format::{self, FileHeader, HEADER_SIZE, INDEX_OFFSET_SENTINEL, LEN_PREFIX_SIZE};

/// Store-level state shared by the writer and reader: the handle, the
/// decoded header, the schema (if the file has one), and the codec.
pub(crate) struct Accessor<F, C> {
    pub(crate) handle: F,
    pub(crate) codec: C,
    pub(crate) header: FileHeader,
    pub(crate) schema: Option<Schema>,
    /// Handle length measured at open time; read paths bounds-check
    /// against it before allocating.
    file_len: u64,
}

impl<F, C> Accessor<F, C> {
    /// Wrap a freshly initialized file whose placeholder header was just
    /// written by the caller.
    pub(crate) fn new_file(handle: F, codec: C, header: FileHeader) -> Self {
        Self {
            handle,
            codec,
            header,
            schema: None,
            file_len: HEADER_SIZE as u64,
        }
    }
}

impl<F: Read + Seek, C: ValueCodec> Accessor<F, C> {
    /// Open a non-empty handle: validate the header, then decode the
    /// schema block that follows it.
    ///
    /// Two kinds of file legitimately have no schema block: a finalized
    /// store that never saw an append (its index block sits directly after
    /// the header) and an unfinalized store (nothing past its header can
    /// be trusted). Both open with `schema: None`.
    pub(crate) fn open_existing(mut handle: F, codec: C) -> Result<Self> {
        let file_len = handle.seek(SeekFrom::End(0))?;
        handle.seek(SeekFrom::Start(0))?;
        let header = FileHeader::read(&mut handle)?;

        if header.is_finalized() && header.index_offset < HEADER_SIZE as u64 {
            return Err(Error::InvalidStore(format!(
                "index offset {} overlaps the header",
                header.index_offset
            )));
        }

        let mut accessor = Self {
            handle,
            codec,
            header,
            schema: None,
            file_len,
        };
        if accessor.header.is_finalized() && accessor.header.index_offset > HEADER_SIZE as u64 {
            let payload = accessor.read_block_at(HEADER_SIZE as u64)?;
            accessor.schema = Some(accessor.codec.decode_schema(&payload)?);
        }
        Ok(accessor)
    }

    /// Seek to `offset` and read one framed block, capping the accepted
    /// payload length at the bytes that actually remain in the file.
    pub(crate) fn read_block_at(&mut self, offset: u64) -> Result<Vec<u8>> {
        let payload_start = offset
            .checked_add(LEN_PREFIX_SIZE as u64)
            .filter(|start| *start <= self.file_len);
        let limit = match payload_start {
            Some(start) => self.file_len - start,
            None => {
                return Err(Error::InvalidStore(format!(
                    "block offset {} lies past the end of the file ({} bytes)",
                    offset, self.file_len
                )));
            }
        };
        self.handle.seek(SeekFrom::Start(offset))?;
        format::read_block(&mut self.handle, limit)
    }

    /// Read and decode the full index block.
    ///
    /// Fails on unfinalized files and on files whose header key count
    /// disagrees with the index contents.
    pub(crate) fn load_index(&mut self) -> Result<KeyIndex> {
        if self.header.index_offset == INDEX_OFFSET_SENTINEL {
            return Err(Error::InvalidStore(
                "file was never finalized; it has no index".to_string(),
            ));
        }
        let payload = self.read_block_at(self.header.index_offset)?;
        let index = self.codec.decode_index(&payload)?;
        if index.len() as u64 != self.header.key_count {
            return Err(Error::InvalidStore(format!(
                "header records {} keys but the index holds {}",
                self.header.key_count,
                index.len()
            )));
        }
        Ok(index)
    }

    /// Read the record block at `offset` and decode it against the schema
    pub(crate) fn record_at(&mut self, offset: u64) -> Result<Record> {
        let payload = self.read_block_at(offset)?;
        let schema = self.schema.as_ref().ok_or_else(|| {
            Error::InvalidStore(
                "index points at record blocks but the file has no schema block".to_string(),
            )
        })?;
        self.codec.decode_record(schema, &payload)
    }
}
