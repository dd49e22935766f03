//! Handlers for a person's documents.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pessoas/{id}/docs` | Current records in canonical category order |
//! | `POST` | `/pessoas/{id}/docs` | `multipart/form-data`, one file field per category |
//! | `GET`  | `/pessoas/{id}/docs/{categoria}` | The stored file itself |
//! | `GET`  | `/pessoas/{id}/status` | `docsStatus` only |
//!
//! An upload is validated as a whole before anything is written: every file
//! part is read and planned first, so a bad part rejects the request with no
//! side effects. Writing is then one independent replace per category.

use axum::{
  extract::{Multipart, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use pcd_core::{
  completeness::DocsStatus,
  document::{DocumentCategory, DocumentRecord, NewDocument},
  person::Person,
  routing::{FieldRouting, UploadPlan, content_type_for, plan_upload},
  storage::BlobStorage,
  store::DocumentStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
  remove_blob,
};

async fn require_person<S: DocumentStore>(store: &S, id: Uuid) -> Result<Person, ApiError> {
  store
    .get_person(id)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /pessoas/{id}/docs`
pub async fn list<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  require_person(state.store.as_ref(), id).await?;
  let records = state.store.list_documents(id).await.map_err(ApiError::backend)?;
  Ok(Json(records))
}

// ─── Download ────────────────────────────────────────────────────────────────

/// `GET /pessoas/{id}/docs/{categoria}`
pub async fn download<S, B>(
  State(state): State<ApiState<S, B>>,
  Path((id, category)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let category = DocumentCategory::parse(&category).map_err(ApiError::backend)?;
  require_person(state.store.as_ref(), id).await?;

  let record = state
    .store
    .list_documents(id)
    .await
    .map_err(ApiError::backend)?
    .into_iter()
    .find(|r| r.category == category)
    .ok_or_else(|| ApiError::NotFound(format!("person {id} has no {category} document")))?;

  let Some(contents) = state.blobs.get(&record.location).await.map_err(ApiError::backend)? else {
    tracing::warn!(person_id = %id, location = %record.location, "document record without file");
    return Err(ApiError::NotFound(format!("file for {category} is missing")));
  };

  let disposition = format!("inline; filename=\"{}\"", record.filename);
  Ok((
    [
      (header::CONTENT_TYPE, content_type_for(&record.filename).to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    contents,
  ))
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// `GET /pessoas/{id}/status`
pub async fn status<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DocsStatus>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let status = state
    .evaluator
    .evaluate(state.store.as_ref(), id)
    .await
    .map_err(ApiError::backend)?;
  Ok(Json(status))
}

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  #[serde(rename = "docsStatus")]
  pub docs_status: DocsStatus,
  /// Records written by this request, in the order they were stored.
  pub documents:   Vec<DocumentRecord>,
}

struct PendingFile {
  plan:     UploadPlan,
  contents: Bytes,
}

/// Read every part of the body and plan each non-empty file part. Text parts
/// and file inputs left blank by the browser are skipped. When two parts map
/// to the same category the later one wins.
async fn collect_files(
  routing: &FieldRouting,
  person: &Person,
  mut multipart: Multipart,
) -> Result<Vec<PendingFile>, ApiError> {
  let now = Utc::now();
  let mut pending: Vec<PendingFile> = Vec::new();

  while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
    let name = field.name().unwrap_or_default().to_owned();
    let Some(original_name) = field.file_name().map(str::to_owned) else {
      continue;
    };
    let content_type = field.content_type().map(str::to_owned);
    let contents = field.bytes().await.map_err(ApiError::multipart)?;
    if contents.is_empty() {
      continue;
    }

    let plan = plan_upload(
      routing,
      person,
      &name,
      Some(original_name.as_str()).filter(|n| !n.is_empty()),
      content_type.as_deref(),
      now,
    )
    .map_err(ApiError::backend)?;

    pending.retain(|p| p.plan.category != plan.category);
    pending.push(PendingFile { plan, contents });
  }

  Ok(pending)
}

/// `POST /pessoas/{id}/docs`
pub async fn upload<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
  multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let person = require_person(state.store.as_ref(), id).await?;
  let pending = collect_files(&state.routing, &person, multipart).await?;
  if pending.is_empty() {
    return Err(ApiError::BadRequest("no files uploaded".into()));
  }

  let mut stored = Vec::with_capacity(pending.len());
  for PendingFile { plan, contents } in pending {
    let blob = state
      .blobs
      .put(&plan.folder, &plan.filename, &contents)
      .await
      .map_err(ApiError::backend)?;

    let replacement = match state
      .store
      .replace_document(NewDocument {
        person_id:    id,
        category:     plan.category,
        filename:     plan.filename.clone(),
        location:     blob.location.clone(),
        content_hash: blob.content_hash,
        size_bytes:   blob.size_bytes,
      })
      .await
    {
      Ok(r) => r,
      Err(e) => {
        remove_blob(state.blobs.as_ref(), &blob.location).await;
        return Err(ApiError::backend(e));
      }
    };

    if let Some(old) = &replacement.superseded {
      if old.location != replacement.record.location {
        remove_blob(state.blobs.as_ref(), &old.location).await;
      }
    }
    tracing::info!(
      person_id = %id,
      field = %plan.field,
      category = %plan.category,
      location = %replacement.record.location,
      replaced = replacement.superseded.is_some(),
      "stored document"
    );
    stored.push(replacement.record);
  }

  let docs_status = state
    .evaluator
    .evaluate(state.store.as_ref(), id)
    .await
    .map_err(ApiError::backend)?;
  Ok((StatusCode::CREATED, Json(UploadResponse { docs_status, documents: stored })))
}
