//! `GET /categorias`: the document checklist and upload-field table the
//! server was configured with.

use axum::{Json, extract::State};
use pcd_core::{
  document::{DocumentCategory, Requirement},
  routing::RoutingRule,
  storage::BlobStorage,
  store::DocumentStore,
};
use serde::Serialize;

use crate::ApiState;

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
  pub category:    DocumentCategory,
  pub requirement: Requirement,
}

#[derive(Debug, Serialize)]
pub struct Catalog {
  /// Every category in canonical order.
  pub categories: Vec<CategoryInfo>,
  /// Field-name tokens, in matching order.
  pub routing:    Vec<RoutingRule>,
  pub fallback:   DocumentCategory,
}

/// `GET /categorias`
pub async fn list<S, B>(State(state): State<ApiState<S, B>>) -> Json<Catalog>
where
  S: DocumentStore,
  B: BlobStorage,
{
  let taxonomy = state.evaluator.taxonomy();
  Json(Catalog {
    categories: DocumentCategory::all()
      .map(|category| CategoryInfo { category, requirement: taxonomy.requirement(category) })
      .collect(),
    routing:    state.routing.rules().to_vec(),
    fallback:   state.routing.fallback(),
  })
}
