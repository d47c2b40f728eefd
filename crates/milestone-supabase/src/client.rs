//! [`SupabaseClient`] — the PostgREST implementation of [`AlbumBackend`].

use std::time::Duration;

use milestone_core::{
  album::{Album, SubjectProfile},
  backend::{AlbumBackend, DocumentRow, PhotoRow},
};
use reqwest::{
  Client, Response,
  header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{Error, Result, filter};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ALBUMS: &str = "shared_albums";
const PROFILES: &str = "babies";
const PHOTOS: &str = "photos";
const DOCUMENTS: &str = "pdfs";
const VIEW_COUNT_RPC: &str = "increment_album_view_count";

const PROFILE_COLUMNS: &str = "id,name,date_of_birth";
const PHOTO_COLUMNS: &str = "id,uri,storage_url,title,timestamp,baby_id";
const DOCUMENT_COLUMNS: &str = "id,storage_url,title,timestamp,baby_id";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
  /// Project URL, e.g. `https://abcd.supabase.co`.
  pub url:      String,
  /// Public (anonymous) API key.
  pub anon_key: String,
  /// Applied to every request.
  pub timeout:  Duration,
}

impl SupabaseConfig {
  pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
    Self {
      url:      url.into(),
      anon_key: anon_key.into(),
      timeout:  DEFAULT_TIMEOUT,
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Stateless PostgREST client authenticated with the public API key.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
  client:   Client,
  base_url: String,
}

/// The error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestError {
  message: String,
}

impl SupabaseClient {
  pub fn new(config: SupabaseConfig) -> Result<Self> {
    let base_url = config.url.trim().trim_end_matches('/').to_owned();
    if base_url.is_empty() {
      return Err(Error::Config("backend url is empty".into()));
    }
    let key = config.anon_key.trim();
    if key.is_empty() {
      return Err(Error::Config("api key is empty".into()));
    }

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("apikey"), sensitive(key)?);
    headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {key}"))?);

    let client = Client::builder()
      .timeout(config.timeout)
      .default_headers(headers)
      .build()?;
    Ok(Self { client, base_url })
  }

  fn rest_url(&self, path: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, path)
  }

  /// `GET /rest/v1/<table>?<query>`
  async fn select<T>(
    &self,
    table: &'static str,
    query: &[(&str, String)],
  ) -> Result<Vec<T>>
  where
    T: DeserializeOwned + Send,
  {
    tracing::debug!(table, "select");
    let resp = self
      .client
      .get(self.rest_url(table))
      .query(query)
      .send()
      .await?;
    let resp = check_status(table, resp).await?;
    Ok(resp.json().await?)
  }

  /// Like [`Self::select`], but at most one row may match.
  async fn select_one<T>(
    &self,
    table: &'static str,
    query: &[(&str, String)],
  ) -> Result<Option<T>>
  where
    T: DeserializeOwned + Send,
  {
    let mut rows: Vec<T> = self.select(table, query).await?;
    match rows.len() {
      0 | 1 => Ok(rows.pop()),
      count => Err(Error::MultipleRows { table, count }),
    }
  }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
  let mut header = HeaderValue::from_str(value)
    .map_err(|_| Error::Config("api key is not a valid header value".into()))?;
  header.set_sensitive(true);
  Ok(header)
}

async fn check_status(table: &str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<PostgrestError>(&body)
    .map(|e| e.message)
    .unwrap_or(body);
  Err(Error::Status {
    table: table.to_owned(),
    status,
    message,
  })
}

// ─── AlbumBackend impl ───────────────────────────────────────────────────────

impl AlbumBackend for SupabaseClient {
  type Error = Error;

  async fn find_album_by_token(&self, token: &str) -> Result<Option<Album>> {
    self
      .select_one(ALBUMS, &[
        ("select", "*".to_owned()),
        ("share_token", filter::eq(token)),
        ("is_active", filter::eq("true")),
        // Two is enough to detect a duplicate token.
        ("limit", "2".to_owned()),
      ])
      .await
  }

  async fn get_profile(&self, id: &str) -> Result<Option<SubjectProfile>> {
    self
      .select_one(PROFILES, &[
        ("select", PROFILE_COLUMNS.to_owned()),
        ("id", filter::eq(id)),
        ("limit", "2".to_owned()),
      ])
      .await
  }

  async fn list_photos(
    &self,
    ids: &[String],
    owner_id: &str,
  ) -> Result<Vec<PhotoRow>> {
    self
      .select(PHOTOS, &[
        ("select", PHOTO_COLUMNS.to_owned()),
        ("id", filter::in_list(ids)),
        ("baby_id", filter::eq(owner_id)),
      ])
      .await
  }

  async fn list_documents(
    &self,
    ids: &[String],
    owner_id: &str,
  ) -> Result<Vec<DocumentRow>> {
    self
      .select(DOCUMENTS, &[
        ("select", DOCUMENT_COLUMNS.to_owned()),
        ("id", filter::in_list(ids)),
        ("baby_id", filter::eq(owner_id)),
      ])
      .await
  }

  async fn increment_view_count(&self, album_id: &str) -> Result<()> {
    let path = format!("rpc/{VIEW_COUNT_RPC}");
    let resp = self
      .client
      .post(self.rest_url(&path))
      .json(&json!({ "album_id": album_id }))
      .send()
      .await?;
    check_status(VIEW_COUNT_RPC, resp).await?;
    Ok(())
  }
}
