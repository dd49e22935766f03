//! `GET /historico`: the activity log, newest first.

use axum::extract::State;
use pcd_core::{
  activity::{ActivityEntry, ActivityQuery},
  storage::BlobStorage,
  store::DocumentStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Query},
};

const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct Params {
  pub limit:  Option<usize>,
  /// Only entries about this person.
  pub pessoa: Option<Uuid>,
}

/// `GET /historico[?limit=<n>][&pessoa=<uuid>]`
pub async fn list<S, B>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<Params>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let query = ActivityQuery {
    person_id: params.pessoa,
    limit:     params.limit.map(|l| l.min(MAX_LIMIT)),
  };
  let entries = state.store.list_activity(&query).await.map_err(ApiError::backend)?;
  Ok(Json(entries))
}
