//! Handlers for `/eventos` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/eventos` | Ordered by date, undated last |
//! | `POST`   | `/eventos` | Body: `{"name":"...","date":"2024-05-01"}` |
//! | `GET`    | `/eventos/{id}` | 404 if not found |
//! | `PUT`    | `/eventos/{id}` | Partial update |
//! | `DELETE` | `/eventos/{id}` | 204; people stay, links go |
//! | `PUT`    | `/eventos/{id}/pessoas/{pessoa_id}` | Link, idempotent |
//! | `DELETE` | `/eventos/{id}/pessoas/{pessoa_id}` | Unlink |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use pcd_core::{
  event::{Event, EventPatch, NewEvent},
  storage::BlobStorage,
  store::DocumentStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path},
};

/// `GET /eventos`
pub async fn list<S, B>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let events = state.store.list_events().await.map_err(ApiError::backend)?;
  Ok(Json(events))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default, alias = "nome")]
  pub name:        String,
  #[serde(default, alias = "data")]
  pub date:        Option<NaiveDate>,
  #[serde(default, alias = "descricao")]
  pub description: Option<String>,
}

/// `POST /eventos`
pub async fn create<S, B>(
  State(state): State<ApiState<S, B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let input = NewEvent { name: body.name, date: body.date, description: body.description };
  let event = state.store.add_event(input).await.map_err(ApiError::backend)?;
  tracing::info!(event_id = %event.event_id, "created event");
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Get / update / delete ───────────────────────────────────────────────────

/// `GET /eventos/{id}`
pub async fn get_one<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let event = state
    .store
    .get_event(id)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
  Ok(Json(event))
}

/// `"date": null` and `"description": null` clear those fields.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  #[serde(default, alias = "nome")]
  pub name:        Option<String>,
  #[serde(default, alias = "data", deserialize_with = "crate::nullable::deserialize")]
  pub date:        Option<Option<NaiveDate>>,
  #[serde(default, alias = "descricao", deserialize_with = "crate::nullable::deserialize")]
  pub description: Option<Option<String>>,
}

/// `PUT /eventos/{id}`
pub async fn update<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Event>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let patch = EventPatch { name: body.name, date: body.date, description: body.description };
  let event = state
    .store
    .update_event(id, patch)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
  Ok(Json(event))
}

/// `DELETE /eventos/{id}`
pub async fn delete<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  if state.store.delete_event(id).await.map_err(ApiError::backend)? {
    tracing::info!(event_id = %id, "deleted event");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("event {id} not found")))
  }
}

// ─── Associations ────────────────────────────────────────────────────────────

/// `PUT /eventos/{id}/pessoas/{pessoa_id}`
pub async fn link<S, B>(
  State(state): State<ApiState<S, B>>,
  Path((event_id, person_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let created = state
    .store
    .link(person_id, event_id)
    .await
    .map_err(ApiError::backend)?;
  Ok(if created { StatusCode::CREATED } else { StatusCode::NO_CONTENT })
}

/// `DELETE /eventos/{id}/pessoas/{pessoa_id}`
pub async fn unlink<S, B>(
  State(state): State<ApiState<S, B>>,
  Path((event_id, person_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  if state
    .store
    .unlink(person_id, event_id)
    .await
    .map_err(ApiError::backend)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!(
      "person {person_id} is not linked to event {event_id}"
    )))
  }
}
