//! Error type for `pcd-storage-fs`.

use pcd_core::{Classify, ErrorClass};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid storage path: {0:?}")]
  InvalidPath(String),
}

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Error::Io(_) => ErrorClass::Internal,
      Error::InvalidPath(_) => ErrorClass::Invalid,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
