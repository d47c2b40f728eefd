//! The `AlbumBackend` trait and the raw rows it returns.
//!
//! The trait is implemented by backend clients (e.g. `milestone-supabase`).
//! The service layer depends on this abstraction, never on a concrete client,
//! so tests can substitute [`crate::memory::MemoryBackend`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::album::{Album, SubjectProfile};

// ─── Raw media rows ──────────────────────────────────────────────────────────

/// A row of the `photos` collection as the backend returns it.
///
/// `timestamp` is kept as raw JSON: upstream writers are not consistent about
/// its type, and malformed values are resolved during normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRow {
  pub id:          String,
  #[serde(default)]
  pub uri:         Option<String>,
  #[serde(default)]
  pub storage_url: Option<String>,
  #[serde(default)]
  pub title:       Option<String>,
  #[serde(default)]
  pub timestamp:   serde_json::Value,
  pub baby_id:     String,
}

/// A row of the `pdfs` collection as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRow {
  pub id:          String,
  #[serde(default)]
  pub storage_url: Option<String>,
  #[serde(default)]
  pub title:       Option<String>,
  #[serde(default)]
  pub timestamp:   serde_json::Value,
  pub baby_id:     String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read access to the album collections plus the one mutation this system
/// performs (the view counter).
///
/// All methods return `Send` futures so implementations can be shared across
/// axum handlers and spawned tasks.
pub trait AlbumBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up the album with exactly this share token and `is_active = true`.
  /// Returns `None` when no row matches.
  fn find_album_by_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<Album>, Self::Error>> + Send + 'a;

  /// Fetch a subject profile by identifier.
  fn get_profile<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<SubjectProfile>, Self::Error>> + Send + 'a;

  /// Photo rows whose id is in `ids` and whose owner is `owner_id`.
  fn list_photos<'a>(
    &'a self,
    ids: &'a [String],
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Vec<PhotoRow>, Self::Error>> + Send + 'a;

  /// Document rows whose id is in `ids` and whose owner is `owner_id`.
  fn list_documents<'a>(
    &'a self,
    ids: &'a [String],
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Vec<DocumentRow>, Self::Error>> + Send + 'a;

  /// Invoke the server-side view counter increment for an album.
  fn increment_view_count<'a>(
    &'a self,
    album_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
