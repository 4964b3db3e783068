//! Store Reader - Random Access to Finalized Store Files
//!
//! This module implements `FileReader`, which serves point and batch reads
//! from a finalized store file.
//!
//! ## What Does FileReader Do?
//!
//! 1. **Validates the header** (magic bytes, version) at open time and
//!    decodes the schema block
//! 2. **Loads the key index lazily**: the first lookup reads and caches
//!    the whole key -> offset map, later lookups hit the cache
//! 3. **Serves reads** with one seek and one framed block read per record,
//!    decoded and shape-checked against the schema
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::fs::File;
//! use fleetfile_storage::FileReader;
//!
//! let mut reader = FileReader::open(File::open("fleet.flt")?)?;
//!
//! // Point read
//! let record = reader.read(100)?;
//!
//! // Batch read, results in input order
//! let records = reader.read_many([100, 101, 102])?;
//!
//! // Sorted key listing
//! for key in reader.keys()? {
//!     println!("{}", key);
//! }
//! ```
//!
//! ## Unfinalized Files
//!
//! A file whose header still carries the sentinel index offset opens
//! successfully (the header itself is valid), but any operation needing
//! the index fails with `Error::InvalidStore`. This lets tooling inspect
//! half-written files without pretending they hold readable data.

use std::collections::BTreeSet;
use std::io::{Read, Seek};

use tracing::debug;

use fleetfile_core::{BincodeCodec, Error, Key, KeyIndex, Record, Result, Schema, ValueCodec};

use crate::accessor::Accessor;
use crate::format::FileHeader;

/// Serves keyed reads from a finalized store file
pub struct FileReader<F, C = BincodeCodec> {
    acc: Accessor<F, C>,

    /// Cached key index, loaded on first use
    index: Option<KeyIndex>,
}

impl<F: Read + Seek> FileReader<F, BincodeCodec> {
    /// Open `handle` with the default bincode codec
    pub fn open(handle: F) -> Result<Self> {
        Self::with_codec(handle, BincodeCodec)
    }
}

impl<F: Read + Seek, C: ValueCodec> FileReader<F, C> {
    /// Open `handle` with a custom codec.
    ///
    /// Validates the header and decodes the schema block. The index is not
    /// touched until the first operation that needs it.
    pub fn with_codec(handle: F, codec: C) -> Result<Self> {
        let acc = Accessor::open_existing(handle, codec)?;
        debug!(
            keys = acc.header.key_count,
            finalized = acc.header.is_finalized(),
            "opened store for reading"
        );
        Ok(Self { acc, index: None })
    }

    /// Load the index on first use and cache it for the reader's lifetime
    fn index(&mut self) -> Result<&KeyIndex> {
        if self.index.is_none() {
            let index = self.acc.load_index()?;
            debug!(entries = index.len(), "index loaded");
            self.index = Some(index);
        }
        // Populated just above; the closure never runs.
        Ok(self.index.get_or_insert_with(KeyIndex::new))
    }

    /// All keys in the store, sorted.
    ///
    /// Integer keys come before string keys; each group is sorted within
    /// itself. The listing is identical across calls on the same file.
    pub fn keys(&mut self) -> Result<BTreeSet<Key>> {
        Ok(self.index()?.keys().cloned().collect())
    }

    /// Read the record stored under `key`
    pub fn read<K: Into<Key>>(&mut self, key: K) -> Result<Record> {
        let key = key.into();
        let offset = match self.index()?.get(&key) {
            Some(offset) => *offset,
            None => return Err(Error::KeyNotFound(key)),
        };
        self.acc.record_at(offset)
    }

    /// Read several keys in one call.
    ///
    /// Records come back in input order. The first missing key fails the
    /// whole call with [`Error::KeyNotFound`]; the reader itself stays
    /// usable afterwards.
    pub fn read_many<I>(&mut self, keys: I) -> Result<Vec<Record>>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        keys.into_iter().map(|key| self.read(key)).collect()
    }

    /// Number of keys recorded in the header at finalize time
    pub fn key_count(&self) -> u64 {
        self.acc.header.key_count
    }

    /// The decoded header
    pub fn header(&self) -> FileHeader {
        self.acc.header
    }

    /// The schema of this file's records, if any were written
    pub fn schema(&self) -> Option<&Schema> {
        self.acc.schema.as_ref()
    }
}
