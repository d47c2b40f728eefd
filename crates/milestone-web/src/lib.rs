//! Server-rendered viewer for shared Milestone albums.
//!
//! Exposes an axum [`Router`] serving `GET /album/{token}` backed by any
//! [`AlbumBackend`]. Every other path renders the not-found page.

pub mod error;
pub mod gallery;
pub mod html;
pub mod meta;
pub mod pages;

pub use error::Error;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  extract::{Path, Query, State, rejection::QueryRejection},
  http::{StatusCode, Uri, header},
  response::{Html, IntoResponse, Response},
  routing::get,
};
use milestone_core::{
  backend::AlbumBackend,
  policy::{DEFAULT_STORAGE_HOST_SUFFIX, StoragePolicy},
  service,
  views::ViewCounter,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use gallery::Gallery;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MILESTONE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// Backend project URL.
  pub supabase_url:         String,
  /// Public (anonymous) backend API key.
  pub supabase_anon_key:    String,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Images must come from a subdomain of this host.
  #[serde(default = "default_storage_host_suffix")]
  pub storage_host_suffix:  String,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_request_timeout_secs() -> u64 { 10 }

fn default_storage_host_suffix() -> String {
  DEFAULT_STORAGE_HOST_SUFFIX.to_owned()
}

impl ServerConfig {
  /// Reject blank required settings, which deserialise fine but are useless.
  pub fn validate(&self) -> Result<(), Error> {
    if self.supabase_url.trim().is_empty() {
      return Err(Error::Config("supabase_url must not be empty".into()));
    }
    if self.supabase_anon_key.trim().is_empty() {
      return Err(Error::Config("supabase_anon_key must not be empty".into()));
    }
    if self.request_timeout_secs == 0 {
      return Err(Error::Config("request_timeout_secs must be positive".into()));
    }
    Ok(())
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn storage_policy(&self) -> StoragePolicy {
    StoragePolicy::new(self.storage_host_suffix.as_str())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<B: AlbumBackend> {
  pub backend: Arc<B>,
  pub views:   ViewCounter,
  pub policy:  Arc<StoragePolicy>,
}

impl<B> AppState<B>
where
  B: AlbumBackend + 'static,
{
  /// Build state and start the view counter worker on the current runtime.
  pub fn new(backend: Arc<B>, policy: StoragePolicy) -> Self {
    let views = ViewCounter::spawn(backend.clone());
    Self {
      backend,
      views,
      policy: Arc::new(policy),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the album viewer.
pub fn router<B>(state: AppState<B>) -> Router
where
  B: AlbumBackend + Clone + 'static,
{
  Router::new()
    .route("/album/{token}", get(album_handler::<B>))
    .fallback(not_found_handler)
    .with_state(state)
    .layer(TraceLayer::new_for_http())
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AlbumParams {
  /// Viewer position; kept raw so junk values close the viewer instead of
  /// failing the request.
  pub photo: Option<String>,
}

async fn album_handler<B>(
  State(state): State<AppState<B>>,
  Path(token): Path<String>,
  params: Result<Query<AlbumParams>, QueryRejection>,
  uri: Uri,
) -> Response
where
  B: AlbumBackend + Clone + 'static,
{
  // A query we cannot read leaves the viewer closed.
  let params = params.map(|Query(p)| p).unwrap_or_else(|e| {
    tracing::debug!(error = %e, "ignoring unreadable album query");
    AlbumParams { photo: None }
  });

  let Some(page) =
    service::load_album_page(state.backend.as_ref(), &token).await
  else {
    return not_found();
  };

  // Moving through the viewer is not a new visit.
  if params.photo.is_none() {
    state.views.bump(page.album.id.clone());
  }

  let gallery = Gallery::new(&page.assets, &state.policy)
    .with_viewer(params.photo.as_deref());
  pages::album(&page, &gallery, uri.path())
    .map(|body| html_page(StatusCode::OK, body))
    .into_response_or_err()
}

async fn not_found_handler() -> Response { not_found() }

fn not_found() -> Response {
  pages::not_found()
    .map(|body| html_page(StatusCode::NOT_FOUND, body))
    .into_response_or_err()
}

/// Pages are always rendered fresh; nothing may cache them.
fn html_page(status: StatusCode, body: String) -> Response {
  (status, [(header::CACHE_CONTROL, "no-store")], Html(body)).into_response()
}

// ─── Helper trait ────────────────────────────────────────────────────────────

trait IntoResponseOrErr {
  fn into_response_or_err(self) -> Response;
}

impl IntoResponseOrErr for Result<Response, Error> {
  fn into_response_or_err(self) -> Response {
    match self {
      Ok(r)  => r,
      Err(e) => e.into_response(),
    }
  }
}
