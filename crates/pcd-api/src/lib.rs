//! JSON REST API for the document-collection service.
//!
//! Exposes an axum [`Router`] backed by any [`DocumentStore`] and
//! [`BlobStorage`]. Auth, TLS, CORS and body limits are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pcd_api::api_router(ApiState::standard(store, blobs)))
//! ```

pub mod backup;
pub mod categories;
pub mod documents;
pub mod error;
pub mod events;
pub mod extract;
pub mod history;
pub mod people;

mod nullable;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use pcd_core::{
  completeness::CompletenessEvaluator,
  routing::FieldRouting,
  storage::BlobStorage,
  store::DocumentStore,
};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through every handler.
pub struct ApiState<S, B> {
  pub store:     Arc<S>,
  pub blobs:     Arc<B>,
  pub evaluator: Arc<CompletenessEvaluator>,
  pub routing:   Arc<FieldRouting>,
}

impl<S, B> ApiState<S, B> {
  pub fn new(
    store: Arc<S>,
    blobs: Arc<B>,
    evaluator: CompletenessEvaluator,
    routing: FieldRouting,
  ) -> Self {
    Self {
      store,
      blobs,
      evaluator: Arc::new(evaluator),
      routing: Arc::new(routing),
    }
  }

  /// State with the standard taxonomy and upload-field table.
  pub fn standard(store: Arc<S>, blobs: Arc<B>) -> Self {
    Self::new(store, blobs, CompletenessEvaluator::default(), FieldRouting::standard())
  }
}

impl<S, B> Clone for ApiState<S, B> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      blobs:     Arc::clone(&self.blobs),
      evaluator: Arc::clone(&self.evaluator),
      routing:   Arc::clone(&self.routing),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, B>(state: ApiState<S, B>) -> Router<()>
where
  S: DocumentStore + 'static,
  B: BlobStorage + 'static,
{
  Router::new()
    // People
    .route("/pessoas", get(people::list::<S, B>).post(people::create::<S, B>))
    .route(
      "/pessoas/{id}",
      get(people::get_one::<S, B>)
        .put(people::update::<S, B>)
        .delete(people::delete::<S, B>),
    )
    // Documents
    .route(
      "/pessoas/{id}/docs",
      get(documents::list::<S, B>).post(documents::upload::<S, B>),
    )
    .route("/pessoas/{id}/docs/{categoria}", get(documents::download::<S, B>))
    .route("/pessoas/{id}/status", get(documents::status::<S, B>))
    // Events
    .route("/eventos", get(events::list::<S, B>).post(events::create::<S, B>))
    .route(
      "/eventos/{id}",
      get(events::get_one::<S, B>)
        .put(events::update::<S, B>)
        .delete(events::delete::<S, B>),
    )
    .route(
      "/eventos/{id}/pessoas/{pessoa_id}",
      put(events::link::<S, B>).delete(events::unlink::<S, B>),
    )
    // History, export, reference data
    .route("/historico", get(history::list::<S, B>))
    .route("/backup", get(backup::export::<S, B>))
    .route("/categorias", get(categories::list::<S, B>))
    .with_state(state)
}

/// Delete a blob, logging instead of failing. Used once the store no longer
/// references it.
pub(crate) async fn remove_blob<B: BlobStorage>(blobs: &B, location: &str) {
  match blobs.remove(location).await {
    Ok(true) => tracing::debug!(%location, "removed blob"),
    Ok(false) => tracing::warn!(%location, "blob already missing"),
    Err(e) => tracing::warn!(%location, error = %e, "failed to remove blob"),
  }
}

#[cfg(test)]
mod tests;
