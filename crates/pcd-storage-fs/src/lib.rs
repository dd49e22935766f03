//! Local-disk backend for uploaded document files.
//!
//! Blobs live under a single root directory, one sub-folder per person, and
//! are written through a temporary file so a reader never sees a partial
//! upload.

mod disk;

pub mod error;

pub use disk::{DiskStorage, content_hash};
pub use error::{Error, Result};
