//! Store Writer - Appending Keyed Records to a Single File
//!
//! This module implements `FileWriter`, which appends (key, record) pairs
//! to a store file and finalizes it with a key index.
//!
//! ## What Does FileWriter Do?
//!
//! 1. **Classifies the handle** at open time: empty handles become fresh
//!    stores, finalized stores are reopened for append, anything else is
//!    refused
//! 2. **Fixes the schema** from the first record appended and writes it as
//!    the schema block
//! 3. **Frames each record** as a length-prefixed block, remembering its
//!    byte offset in an in-memory index
//! 4. **Finalizes** by writing the index block and rewriting the header
//!    with the real key count and index offset
//!
//! ## Reopening for Append
//!
//! Reopening loads the existing index so prior keys survive, then stamps a
//! placeholder header so a crash mid-append is detectable. The cursor is
//! parked on the old index block: new record blocks overwrite it, and
//! finalize writes a fresh index after them. Space is never reclaimed;
//! re-appending an existing key leaves the old record block stranded and
//! unreferenced.
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::fs::OpenOptions;
//! use fleetfile_core::Value;
//! use fleetfile_storage::FileWriter;
//!
//! let file = OpenOptions::new()
//!     .read(true)
//!     .write(true)
//!     .create(true)
//!     .open("fleet.flt")?;
//!
//! let mut writer = FileWriter::open(file)?;
//! writer.append(100, &[Value::IntList(vec![1, 2, 3])])?;
//! writer.append("alpha", &[Value::IntList(vec![4, 5])])?;
//! writer.finish()?;
//! ```
//!
//! ## Durability
//!
//! Until `finish` succeeds the file carries a placeholder header and no
//! readable index. Dropping the writer finalizes as a last resort, but a
//! failure there can only be logged; call `finish` directly to observe it.
//!
//! ## Thread Safety
//!
//! FileWriter is NOT thread-safe and a store file must only ever have one
//! writer at a time.

use std::io::{Read, Seek, SeekFrom, Write};

use tracing::{debug, error};

use fleetfile_core::{BincodeCodec, Error, Key, KeyIndex, Result, Schema, Value, ValueCodec};

use crate::accessor::Accessor;
use crate::format::{write_block, FileHeader};

/// How `FileWriter::open` classified the handle it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// The handle was empty and a fresh store was initialized
    Created,

    /// The handle held a finalized store; its keys were loaded and new
    /// appends extend them
    Reopened,
}

/// Appends keyed records to a store file
pub struct FileWriter<F, C = BincodeCodec>
where
    F: Read + Write + Seek,
    C: ValueCodec,
{
    acc: Accessor<F, C>,

    /// Key -> record block offset, written out as the index on finish
    index: KeyIndex,

    /// Handle classification from open time
    mode: OpenMode,

    /// Set once `finish` has completed
    finished: bool,
}

impl<F: Read + Write + Seek> FileWriter<F, BincodeCodec> {
    /// Open `handle` for appending with the default bincode codec
    pub fn open(handle: F) -> Result<Self> {
        Self::with_codec(handle, BincodeCodec)
    }
}

impl<F, C> FileWriter<F, C>
where
    F: Read + Write + Seek,
    C: ValueCodec,
{
    /// Open `handle` for appending with a custom codec.
    ///
    /// An empty handle is initialized as a fresh store. A non-empty handle
    /// must hold a finalized store of the supported version; its index is
    /// loaded so prior keys survive the append session. Anything else
    /// fails: a foreign or damaged file is never silently re-initialized.
    pub fn with_codec(mut handle: F, codec: C) -> Result<Self> {
        let len = handle.seek(SeekFrom::End(0))?;
        if len == 0 {
            // Fresh store: stamp a placeholder header, real one on finish.
            handle.seek(SeekFrom::Start(0))?;
            let header = FileHeader::placeholder(0);
            header.write(&mut handle)?;
            debug!("initialized fresh store");
            return Ok(Self {
                acc: Accessor::new_file(handle, codec, header),
                index: KeyIndex::new(),
                mode: OpenMode::Created,
                finished: false,
            });
        }

        let mut acc = Accessor::open_existing(handle, codec)?;
        if !acc.header.is_finalized() {
            return Err(Error::InvalidStore(
                "cannot append to an unfinalized store; its existing keys are unrecoverable"
                    .to_string(),
            ));
        }
        let old_index_offset = acc.header.index_offset;
        let index = acc.load_index()?;

        // Back to a placeholder so a crash mid-append is detectable, then
        // park the cursor on the old index block; new records overwrite it.
        acc.header = FileHeader::placeholder(index.len() as u64);
        acc.handle.seek(SeekFrom::Start(0))?;
        acc.header.write(&mut acc.handle)?;
        acc.handle.seek(SeekFrom::Start(old_index_offset))?;
        debug!(
            keys = index.len(),
            append_at = old_index_offset,
            "reopened store for append"
        );

        Ok(Self {
            acc,
            index,
            mode: OpenMode::Reopened,
            finished: false,
        })
    }

    /// Append one record under `key`.
    ///
    /// The first record ever appended to the file fixes its schema; every
    /// later record must match it. Appending a key that already exists
    /// replaces its index entry, so the last record wins at read time.
    pub fn append<K: Into<Key>>(&mut self, key: K, record: &[Value]) -> Result<()> {
        if self.finished {
            return Err(Error::InvalidStore(
                "writer is already finished".to_string(),
            ));
        }

        // Encode before touching the file so a codec failure leaves the
        // write cursor where it was.
        let payload = if let Some(schema) = &self.acc.schema {
            self.acc.codec.encode_record(schema, record)?
        } else {
            let schema = self.acc.codec.infer_schema(record)?;
            let payload = self.acc.codec.encode_record(&schema, record)?;
            let schema_payload = self.acc.codec.encode_schema(&schema)?;
            write_block(&mut self.acc.handle, &schema_payload)?;
            debug!(fields = schema.len(), "schema fixed from first record");
            self.acc.schema = Some(schema);
            payload
        };

        let offset = self.acc.handle.stream_position()?;
        write_block(&mut self.acc.handle, &payload)?;
        self.index.insert(key.into(), offset);
        Ok(())
    }

    /// Write the index block and the final header.
    ///
    /// Idempotent: the first call finalizes, later calls are no-ops. The
    /// handle itself stays open; closing it is the caller's business.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        let index_offset = self.acc.handle.stream_position()?;
        let payload = self.acc.codec.encode_index(&self.index)?;
        write_block(&mut self.acc.handle, &payload)?;

        self.acc.header = FileHeader {
            key_count: self.index.len() as u64,
            index_offset,
        };
        self.acc.handle.seek(SeekFrom::Start(0))?;
        self.acc.header.write(&mut self.acc.handle)?;
        self.acc.handle.flush()?;

        self.finished = true;
        debug!(
            keys = self.index.len(),
            index_offset, "store finalized"
        );
        Ok(())
    }

    /// How the handle was classified at open time
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Number of keys currently indexed (loaded plus appended)
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// The schema fixed for this file, if any record has been appended
    pub fn schema(&self) -> Option<&Schema> {
        self.acc.schema.as_ref()
    }
}

impl<F, C> Drop for FileWriter<F, C>
where
    F: Read + Write + Seek,
    C: ValueCodec,
{
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.finish() {
                error!(error = %e, "failed to finalize store on drop");
            }
        }
    }
}
