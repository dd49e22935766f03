//! Error types for `pcd-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("{0} must not be blank")]
  BlankField(&'static str),

  #[error("unknown document category: {0:?}")]
  UnknownCategory(String),

  #[error("unsupported file format {found:?} for field {field:?} (accepted: jpg, jpeg, png, pdf)")]
  UnsupportedFormat { field: String, found: String },
}

impl Error {
  pub fn class(&self) -> ErrorClass {
    match self {
      Self::PersonNotFound(_) | Self::EventNotFound(_) => ErrorClass::NotFound,
      Self::BlankField(_)
      | Self::UnknownCategory(_)
      | Self::UnsupportedFormat { .. } => ErrorClass::Invalid,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse category of a backend failure, used by the HTTP layer to choose a
/// status code without knowing the concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  NotFound,
  Conflict,
  Invalid,
  Internal,
}

/// Implemented by store and storage error types.
pub trait Classify {
  fn class(&self) -> ErrorClass;
}

impl Classify for Error {
  fn class(&self) -> ErrorClass { Error::class(self) }
}
