//! Error Types for Fleetfile
//!
//! This module defines all error types that can occur in fleetfile operations.
//!
//! ## Error Categories
//!
//! ### I/O Errors
//! - File system operations
//! - Seek/read/write failures on the underlying handle
//!
//! ### Format Errors
//! - `FormatMismatch`: File doesn't start with the expected magic bytes ("FLTF"),
//!   or is too short to hold a header at all
//! - `VersionMismatch`: File was written by a format version we don't support
//! - `InvalidStore`: Structurally broken store (truncated blocks, index/header
//!   disagreement, unfinalized file where a finalized one is required)
//!
//! ### Codec Errors
//! - `Codec`: Record, schema, or index payload failed to encode or decode,
//!   including records that don't match the file's schema
//!
//! ### Query Errors
//! - `KeyNotFound`: Requested key has no entry in the store's index
//!
//! ## Usage
//! All fallible functions in fleetfile return `Result<T>` which is aliased to
//! `Result<T, Error>`. This allows using the `?` operator for error propagation.
//!
//! ## Example
//! ```ignore
//! use fleetfile_core::{Result, Error};
//!
//! fn check_magic(data: &[u8]) -> Result<()> {
//!     // I/O errors automatically convert via #[from]
//!     if &data[0..4] != b"FLTF" {
//!         return Err(Error::FormatMismatch);
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::key::Key;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a fleetfile store (bad magic bytes)")]
    FormatMismatch,

    #[error("Unsupported format version: {0}")]
    VersionMismatch(u32),

    #[error("Key not found: {0}")]
    KeyNotFound(Key),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Invalid store: {0}")]
    InvalidStore(String),
}

pub type Result<T> = std::result::Result<T, Error>;
