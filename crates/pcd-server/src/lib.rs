//! HTTP server assembly for the document-collection service.
//!
//! Mounts the JSON API from [`pcd_api`] under `/api` behind Basic auth, and
//! adds request tracing, CORS and the upload body limit.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::DefaultBodyLimit,
  http::{HeaderValue, Method, header},
  middleware,
  routing::get,
};
use pcd_api::ApiState;
use pcd_core::{storage::BlobStorage, store::DocumentStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Upload limit when the config does not set one: 25 MiB per request.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn default_max_upload_bytes() -> usize { DEFAULT_MAX_UPLOAD_BYTES }

/// Runtime server configuration, deserialised from `config.toml` and
/// `PCD_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Root directory for uploaded files.
  pub upload_dir:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Browser origins allowed to call the API cross-origin.
  #[serde(default)]
  pub allowed_origins:    Vec<String>,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:   usize,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S, B>(api: ApiState<S, B>, config: &ServerConfig) -> Router
where
  S: DocumentStore + 'static,
  B: BlobStorage + 'static,
{
  let protected = pcd_api::api_router(api)
    .layer(DefaultBodyLimit::max(config.max_upload_bytes))
    .layer(middleware::from_fn_with_state(Arc::new(config.auth()), auth::require_auth));

  Router::new()
    .route("/health", get(health))
    .nest("/api", protected)
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&config.allowed_origins))
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

fn cors_layer(origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> = origins
    .iter()
    .map(|o| o.trim())
    .filter(|o| !o.is_empty())
    .filter(|o| {
      // A wildcard cannot be combined with credentialed requests.
      let wildcard = *o == "*";
      if wildcard {
        tracing::warn!("ignoring wildcard CORS origin; list origins explicitly");
      }
      !wildcard
    })
    .filter_map(|o| match o.parse::<HeaderValue>() {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .allow_credentials(true)
    .max_age(std::time::Duration::from_secs(3600))
}

// ─── Integration tests ────────────────────────────────────────────────────────
