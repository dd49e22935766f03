use std::path::{Path, PathBuf};

use pcd_core::storage::{BlobStorage, StoredBlob};
use sha2::{Digest, Sha256};
use tokio::{fs, io::AsyncWriteExt as _};

use crate::{Error, Result};

/// Stores blobs as plain files below `root`.
#[derive(Debug, Clone)]
pub struct DiskStorage {
  root: PathBuf,
}

impl DiskStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Create the root directory if it does not exist yet.
  pub async fn ensure_root(&self) -> Result<()> {
    fs::create_dir_all(&self.root).await?;
    tracing::info!(root = %self.root.display(), "blob storage ready");
    Ok(())
  }

  /// Resolve a `/`-separated relative location below the root. Absolute
  /// paths and `.`/`..` components are refused.
  fn resolve(&self, location: &str) -> Result<PathBuf> {
    let mut path = self.root.clone();
    for part in location.split('/') {
      if part.is_empty() || part == "." || part == ".." || part.contains('\\') {
        return Err(Error::InvalidPath(location.to_owned()));
      }
      path.push(part);
    }
    Ok(path)
  }
}

/// SHA-256 of `contents` as lowercase hex.
pub fn content_hash(contents: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(contents);
  hex::encode(hasher.finalize())
}

async fn write_then_rename(
  temp_path: &Path,
  full_path: &Path,
  contents: &[u8],
) -> std::io::Result<()> {
  let mut file = fs::File::create(temp_path).await?;
  file.write_all(contents).await?;
  file.sync_all().await?;
  drop(file);
  fs::rename(temp_path, full_path).await
}

impl BlobStorage for DiskStorage {
  type Error = Error;

  async fn put(&self, folder: &str, filename: &str, contents: &[u8]) -> Result<StoredBlob> {
    if filename.contains('/') {
      return Err(Error::InvalidPath(filename.to_owned()));
    }
    let location = format!("{folder}/{filename}");
    let full_path = self.resolve(&location)?;

    if let Some(parent) = full_path.parent() {
      fs::create_dir_all(parent).await.map_err(|e| {
        tracing::warn!(parent = %parent.display(), error = %e, "create_dir_all failed");
        e
      })?;
    }

    let temp_path = full_path.with_extension("part");
    if let Err(e) = write_then_rename(&temp_path, &full_path, contents).await {
      tracing::warn!(
        path = %full_path.display(),
        error = %e,
        "blob write failed"
      );
      if let Err(cleanup) = fs::remove_file(&temp_path).await
        && cleanup.kind() != std::io::ErrorKind::NotFound
      {
        tracing::warn!(temp = %temp_path.display(), error = %cleanup, "temp file left behind");
      }
      return Err(e.into());
    }

    tracing::debug!(%location, size = contents.len(), "stored blob");
    Ok(StoredBlob {
      location,
      content_hash: content_hash(contents),
      size_bytes: contents.len() as u64,
    })
  }

  async fn get(&self, location: &str) -> Result<Option<Vec<u8>>> {
    let full_path = self.resolve(location)?;
    match fs::read(&full_path).await {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn remove(&self, location: &str) -> Result<bool> {
    let full_path = self.resolve(location)?;
    match fs::remove_file(&full_path).await {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(e.into()),
    }
  }
}
