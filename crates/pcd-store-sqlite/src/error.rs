//! Error type for `pcd-store-sqlite`.

use pcd_core::{Classify, ErrorClass};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] pcd_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown activity kind: {0:?}")]
  UnknownActivityKind(String),

  #[error("person not found: {0}")]
  PersonNotFound(uuid::Uuid),

  #[error("event not found: {0}")]
  EventNotFound(uuid::Uuid),

  #[error("national id {0:?} is already registered")]
  DuplicateNationalId(String),
}

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Error::Core(e) => e.class(),
      Error::PersonNotFound(_) | Error::EventNotFound(_) => ErrorClass::NotFound,
      Error::DuplicateNationalId(_) => ErrorClass::Conflict,
      Error::Database(_)
      | Error::Uuid(_)
      | Error::DateParse(_)
      | Error::UnknownActivityKind(_) => ErrorClass::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
