//! The `BlobStorage` trait: where uploaded file contents live.
//!
//! Locations are `/`-separated paths relative to the storage root, as
//! produced by [`crate::routing::UploadPlan::location`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Classify;

/// What a backend reports after writing a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
  pub location:     String,
  /// SHA-256 hex digest of the contents.
  pub content_hash: String,
  pub size_bytes:   u64,
}

pub trait BlobStorage: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// Write `contents` to `folder/filename`, replacing any existing blob at
  /// that location.
  fn put<'a>(
    &'a self,
    folder: &'a str,
    filename: &'a str,
    contents: &'a [u8],
  ) -> impl Future<Output = Result<StoredBlob, Self::Error>> + Send + 'a;

  /// Read a blob back. Returns `None` if nothing is stored at `location`.
  fn get<'a>(
    &'a self,
    location: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Remove a blob. Returns `false` if nothing was stored at `location`.
  fn remove<'a>(
    &'a self,
    location: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
