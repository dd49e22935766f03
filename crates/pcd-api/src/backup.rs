//! `GET /backup`: full JSON export of the store, served as a download.

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use pcd_core::{storage::BlobStorage, store::DocumentStore};

use crate::{ApiState, error::ApiError};

/// `GET /backup`
pub async fn export<S, B>(
  State(state): State<ApiState<S, B>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let snapshot = state.store.snapshot().await.map_err(ApiError::backend)?;
  let disposition = format!(
    "attachment; filename=\"backup-{}.json\"",
    snapshot.exported_at.format("%Y%m%d-%H%M%S")
  );
  tracing::info!(
    people = snapshot.people.len(),
    documents = snapshot.documents.len(),
    "exported backup"
  );
  Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(snapshot)))
}
