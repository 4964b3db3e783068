//! Fleetfile Storage Layer
//!
//! This crate implements the fleetfile on-disk format: a single file
//! holding keyed records behind a key -> offset index.
//!
//! ## What is a Store File?
//!
//! A store file is an append-oriented container for (key, record) pairs.
//! Records are framed sequentially as they arrive; a key index written at
//! finalize time makes every record reachable with one seek. There is no
//! directory and no sidecar state: the one file is the whole store.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────┐
//! │   Caller    │
//! └──────┬──────┘
//!        │ (key, record) pairs
//!        ▼
//! ┌─────────────────┐
//! │ FileWriter      │
//! │ - Fixes schema  │
//! │ - Frames blocks │
//! │ - Tracks index  │
//! └────────┬────────┘
//!          │ finalize: index block + final header
//!          ▼
//! ┌─────────────────┐
//! │  Store file     │
//! │  (FLTF v1)      │
//! └────────┬────────┘
//!          │ open
//!          ▼
//! ┌─────────────────┐
//! │ FileReader      │
//! │ - Validates     │
//! │ - Lazy index    │
//! │ - Seek + decode │
//! └────────┬────────┘
//!          │ records
//!          ▼
//! ┌─────────────┐
//! │   Caller    │
//! └─────────────┘
//! ```
//!
//! ## Main Components
//!
//! ### FileWriter
//! Appends records to a fresh or reopened store and finalizes the index.
//!
//! **Key behaviors**:
//! - Empty handles become fresh stores; finalized stores reopen for append
//! - Schema inferred from the first record and enforced on every append
//! - Duplicate keys resolve to the last record appended
//! - Drop finalizes as a last resort
//!
//! ### FileReader
//! Random access over a finalized store.
//!
//! **Key behaviors**:
//! - Magic byte and version validation before anything else
//! - Index loaded lazily, cached for the reader's lifetime
//! - Point and batch reads, batch results in input order
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::fs::{File, OpenOptions};
//! use fleetfile_core::Value;
//! use fleetfile_storage::{FileReader, FileWriter};
//!
//! // Write
//! let file = OpenOptions::new()
//!     .read(true)
//!     .write(true)
//!     .create(true)
//!     .open("fleet.flt")?;
//! let mut writer = FileWriter::open(file)?;
//! writer.append(100, &[Value::IntList(vec![1, 2, 3])])?;
//! writer.finish()?;
//!
//! // Read
//! let mut reader = FileReader::open(File::open("fleet.flt")?)?;
//! let record = reader.read(100)?;
//! ```
//!
//! Handles are anything `Read + Write + Seek` (writing) or `Read + Seek`
//! (reading), so in-memory stores over `std::io::Cursor` work the same as
//! files on disk.

pub mod format;
pub mod reader;
pub mod writer;

mod accessor;

pub use fleetfile_core::{Error, Result};
pub use reader::FileReader;
pub use writer::{FileWriter, OpenMode};
