//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::MultipartError,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pcd_core::{Classify, ErrorClass};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("payload too large: {0}")]
  PayloadTooLarge(String),

  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store, storage or evaluator error onto a response class.
  pub fn backend<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.class() {
      ErrorClass::NotFound => ApiError::NotFound(e.to_string()),
      ErrorClass::Conflict => ApiError::Conflict(e.to_string()),
      ErrorClass::Invalid => ApiError::BadRequest(e.to_string()),
      ErrorClass::Internal => ApiError::Backend(Box::new(e)),
    }
  }

  pub(crate) fn multipart(e: MultipartError) -> Self {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge(e.body_text())
    } else {
      ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge(rejection.body_text())
    } else {
      ApiError::BadRequest(rejection.body_text())
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::PayloadTooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.clone()),
      ApiError::Backend(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
