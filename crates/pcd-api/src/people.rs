//! Handlers for `/pessoas` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/pessoas` | Optional `?evento=<uuid>&q=<text>` |
//! | `POST`   | `/pessoas` | 201 + the person with `docsStatus` |
//! | `GET`    | `/pessoas/{id}` | Person, `docsStatus` and linked events |
//! | `PUT`    | `/pessoas/{id}` | Partial update |
//! | `DELETE` | `/pessoas/{id}` | 204; stored files are removed too |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use pcd_core::{
  completeness::DocsStatus,
  event::Event,
  person::{NewPerson, Person, PersonPatch},
  storage::BlobStorage,
  store::{DocumentStore, PersonQuery},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
  remove_blob,
};

// ─── Views ───────────────────────────────────────────────────────────────────

/// A person annotated with their completeness summary.
#[derive(Debug, Serialize)]
pub struct PersonWithStatus {
  #[serde(flatten)]
  pub person:      Person,
  #[serde(rename = "docsStatus")]
  pub docs_status: DocsStatus,
}

#[derive(Debug, Serialize)]
pub struct PersonDetail {
  #[serde(flatten)]
  pub person:      Person,
  #[serde(rename = "docsStatus")]
  pub docs_status: DocsStatus,
  pub events:      Vec<Event>,
}

async fn with_status<S, B>(
  state: &ApiState<S, B>,
  person: Person,
) -> Result<PersonWithStatus, ApiError>
where
  S: DocumentStore,
{
  let categories = state
    .store
    .document_categories(person.person_id)
    .await
    .map_err(ApiError::backend)?;
  Ok(PersonWithStatus {
    docs_status: state.evaluator.evaluate_categories(categories),
    person,
  })
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub evento: Option<Uuid>,
  pub q:      Option<String>,
}

/// `GET /pessoas[?evento=<uuid>][&q=<text>]`
pub async fn list<S, B>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonWithStatus>>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let query = PersonQuery { event_id: params.evento, text: params.q };
  let people = state.store.list_people(&query).await.map_err(ApiError::backend)?;

  let ids: Vec<Uuid> = people.iter().map(|p| p.person_id).collect();
  let mut categories = state
    .store
    .categories_for_people(&ids)
    .await
    .map_err(ApiError::backend)?;

  let annotated = people
    .into_iter()
    .map(|person| PersonWithStatus {
      docs_status: state
        .evaluator
        .evaluate_categories(categories.remove(&person.person_id).unwrap_or_default()),
      person,
    })
    .collect();
  Ok(Json(annotated))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Registration body. Accepts the Portuguese form-field names as aliases.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default, alias = "nome")]
  pub full_name:   String,
  #[serde(default, alias = "cpf")]
  pub national_id: String,
  #[serde(default, alias = "telefone")]
  pub phone:       Option<String>,
  #[serde(default, alias = "observacao")]
  pub note:        String,
  #[serde(default, alias = "eventos")]
  pub event_ids:   Vec<Uuid>,
}

impl From<CreateBody> for NewPerson {
  fn from(b: CreateBody) -> Self {
    NewPerson {
      full_name:   b.full_name,
      national_id: b.national_id,
      phone:       b.phone,
      note:        b.note,
      event_ids:   b.event_ids,
    }
  }
}

/// `POST /pessoas`
pub async fn create<S, B>(
  State(state): State<ApiState<S, B>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let person = state.store.add_person(body.into()).await.map_err(ApiError::backend)?;
  tracing::info!(person_id = %person.person_id, "registered person");
  Ok((StatusCode::CREATED, Json(with_status(&state, person).await?)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /pessoas/{id}`
pub async fn get_one<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonDetail>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  let events = state.store.events_for_person(id).await.map_err(ApiError::backend)?;
  let PersonWithStatus { person, docs_status } = with_status(&state, person).await?;
  Ok(Json(PersonDetail { person, docs_status, events }))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial update. `"phone": null` clears the phone; absent keys are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  #[serde(default, alias = "nome")]
  pub full_name:   Option<String>,
  #[serde(default, alias = "cpf")]
  pub national_id: Option<String>,
  #[serde(default, alias = "telefone", deserialize_with = "crate::nullable::deserialize")]
  pub phone:       Option<Option<String>>,
  #[serde(default, alias = "observacao")]
  pub note:        Option<String>,
}

impl From<UpdateBody> for PersonPatch {
  fn from(b: UpdateBody) -> Self {
    PersonPatch {
      full_name:   b.full_name,
      national_id: b.national_id,
      phone:       b.phone,
      note:        b.note,
    }
  }
}

/// `PUT /pessoas/{id}`
pub async fn update<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<PersonWithStatus>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let person = state
    .store
    .update_person(id, body.into())
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(with_status(&state, person).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /pessoas/{id}`
pub async fn delete<S, B>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let removed = state
    .store
    .delete_person(id)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  for record in &removed {
    remove_blob(state.blobs.as_ref(), &record.location).await;
  }
  tracing::info!(person_id = %id, documents = removed.len(), "deleted person");
  Ok(StatusCode::NO_CONTENT)
}
