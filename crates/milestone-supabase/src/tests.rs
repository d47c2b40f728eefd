//! Wire-level tests against a loopback server that speaks the PostgREST
//! dialect used by the client.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Json, Router,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use milestone_core::backend::AlbumBackend;
use serde_json::{Value, json};

use crate::{Error, SupabaseClient, SupabaseConfig};

const KEY: &str = "anon-test-key";

type Params = HashMap<String, String>;

// ─── Fake backend ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Fake {
  rpc_bodies: Arc<Mutex<Vec<Value>>>,
  selects:    Arc<Mutex<Vec<(String, Params)>>>,
}

fn album_row(id: &str, token: &str) -> Value {
  json!({
    "id": id,
    "family_group_id": "family1",
    "baby_id": "baby1",
    "created_by": "parent1",
    "name": "First Summer",
    "description": null,
    "asset_ids": "[\"p1\",\"p2\"]",
    "share_token": token,
    "view_count": 7,
    "expires_at": null,
    "is_active": true,
    "created_at": "2024-05-01T10:00:00.123456+00:00",
    "updated_at": "2024-05-02T10:00:00+00:00"
  })
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
  let key = headers.get("apikey").and_then(|v| v.to_str().ok());
  let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
  let expected = format!("Bearer {KEY}");
  if key == Some(KEY) && bearer == Some(expected.as_str()) {
    Ok(())
  } else {
    Err(
      (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": "PGRST301", "message": "Invalid API key" })),
      )
        .into_response(),
    )
  }
}

fn eq_value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
  params.get(key).and_then(|v| v.strip_prefix("eq."))
}

fn in_values(params: &Params, key: &str) -> Vec<String> {
  params
    .get(key)
    .and_then(|v| v.strip_prefix("in.("))
    .and_then(|v| v.strip_suffix(')'))
    .map(|list| {
      list
        .split(',')
        .map(|s| s.trim_matches('"').to_owned())
        .collect()
    })
    .unwrap_or_default()
}

async fn albums(
  State(fake): State<Fake>,
  headers: HeaderMap,
  Query(params): Query<Params>,
) -> Response {
  if let Err(r) = authorized(&headers) {
    return r;
  }
  fake
    .selects
    .lock()
    .unwrap()
    .push(("shared_albums".into(), params.clone()));
  if eq_value(&params, "is_active") != Some("true") {
    return Json(json!([])).into_response();
  }
  let rows = match eq_value(&params, "share_token") {
    Some("abc123") => json!([album_row("album1", "abc123")]),
    Some("dup") => json!([album_row("a1", "dup"), album_row("a2", "dup")]),
    Some("slow") => {
      tokio::time::sleep(Duration::from_secs(3)).await;
      json!([])
    }
    _ => json!([]),
  };
  Json(rows).into_response()
}

async fn babies(headers: HeaderMap, Query(params): Query<Params>) -> Response {
  if let Err(r) = authorized(&headers) {
    return r;
  }
  assert_eq!(params.get("select").unwrap(), "id,name,date_of_birth");
  let rows = match eq_value(&params, "id") {
    Some("baby1") => {
      json!([{ "id": "baby1", "name": "Lily", "date_of_birth": "2023-04-01" }])
    }
    _ => json!([]),
  };
  Json(rows).into_response()
}

async fn photos(
  State(fake): State<Fake>,
  headers: HeaderMap,
  Query(params): Query<Params>,
) -> Response {
  if let Err(r) = authorized(&headers) {
    return r;
  }
  fake
    .selects
    .lock()
    .unwrap()
    .push(("photos".into(), params.clone()));
  let ids = in_values(&params, "id");
  let owner = eq_value(&params, "baby_id").unwrap_or_default().to_owned();
  let all = [
    json!({ "id": "p1", "uri": "local://p1", "storage_url": "https://x.supabase.co/storage/v1/object/p1.jpg", "title": "Beach", "timestamp": 200, "baby_id": "baby1" }),
    json!({ "id": "p2", "uri": "local://p2", "storage_url": null, "title": null, "timestamp": null, "baby_id": "baby1" }),
    json!({ "id": "p3", "uri": "local://p3", "storage_url": null, "title": null, "timestamp": 5, "baby_id": "baby2" }),
  ];
  let rows: Vec<Value> = all
    .into_iter()
    .filter(|row| {
      ids.iter().any(|id| row["id"] == id.as_str()) && row["baby_id"] == owner.as_str()
    })
    .collect();
  Json(rows).into_response()
}

async fn pdfs(headers: HeaderMap, Query(params): Query<Params>) -> Response {
  if let Err(r) = authorized(&headers) {
    return r;
  }
  if eq_value(&params, "baby_id") == Some("broken") {
    return (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "code": "XX000", "message": "pdfs is on fire" })),
    )
      .into_response();
  }
  Json(json!([
    { "id": "d1", "storage_url": "https://x.supabase.co/storage/v1/object/d1.pdf", "title": "Birth certificate", "timestamp": 150.0, "baby_id": "baby1" }
  ]))
  .into_response()
}

async fn increment(
  State(fake): State<Fake>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Response {
  if let Err(r) = authorized(&headers) {
    return r;
  }
  fake.rpc_bodies.lock().unwrap().push(body);
  StatusCode::NO_CONTENT.into_response()
}

async fn spawn_fake() -> (String, Fake) {
  let fake = Fake::default();
  let app = Router::new()
    .route("/rest/v1/shared_albums", get(albums))
    .route("/rest/v1/babies", get(babies))
    .route("/rest/v1/photos", get(photos))
    .route("/rest/v1/pdfs", get(pdfs))
    .route("/rest/v1/rpc/increment_album_view_count", post(increment))
    .with_state(fake.clone());

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{addr}/"), fake)
}

fn client(url: &str, key: &str) -> SupabaseClient {
  SupabaseClient::new(SupabaseConfig {
    url:      url.to_owned(),
    anon_key: key.to_owned(),
    timeout:  Duration::from_millis(500),
  })
  .expect("client")
}

fn owned(list: &[&str]) -> Vec<String> {
  list.iter().map(|s| (*s).to_owned()).collect()
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn empty_url_or_key_is_rejected() {
  let err = SupabaseClient::new(SupabaseConfig::new("", KEY)).unwrap_err();
  assert!(matches!(err, Error::Config(_)), "{err}");
  let err =
    SupabaseClient::new(SupabaseConfig::new("https://x.supabase.co", "  "))
      .unwrap_err();
  assert!(matches!(err, Error::Config(_)), "{err}");
}

#[test]
fn key_with_control_characters_is_rejected() {
  let err =
    SupabaseClient::new(SupabaseConfig::new("https://x.supabase.co", "a\nb"))
      .unwrap_err();
  assert!(matches!(err, Error::Config(_)), "{err}");
}

// ─── Albums ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn finds_album_and_decodes_encoded_asset_ids() {
  let (url, fake) = spawn_fake().await;
  let album = client(&url, KEY)
    .find_album_by_token("abc123")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(album.id, "album1");
  assert_eq!(album.asset_ids, owned(&["p1", "p2"]));
  assert_eq!(album.view_count, 7);
  assert!(album.expires_at.is_none());

  let selects = fake.selects.lock().unwrap();
  let (_, params) = &selects[0];
  assert_eq!(params["share_token"], "eq.abc123");
  assert_eq!(params["is_active"], "eq.true");
}

#[tokio::test]
async fn unknown_token_is_none() {
  let (url, _) = spawn_fake().await;
  let album = client(&url, KEY).find_album_by_token("zzz").await.unwrap();
  assert!(album.is_none());
}

#[tokio::test]
async fn duplicate_token_is_an_error() {
  let (url, _) = spawn_fake().await;
  let err = client(&url, KEY)
    .find_album_by_token("dup")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MultipleRows { count: 2, .. }), "{err}");
}

#[tokio::test]
async fn wrong_key_surfaces_backend_message() {
  let (url, _) = spawn_fake().await;
  let err = client(&url, "wrong")
    .find_album_by_token("abc123")
    .await
    .unwrap_err();
  match err {
    Error::Status { status, message, .. } => {
      assert_eq!(status, StatusCode::UNAUTHORIZED);
      assert_eq!(message, "Invalid API key");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn slow_backend_times_out() {
  let (url, _) = spawn_fake().await;
  let err = client(&url, KEY)
    .find_album_by_token("slow")
    .await
    .unwrap_err();
  match err {
    Error::Http(e) => assert!(e.is_timeout(), "{e}"),
    other => panic!("unexpected error: {other}"),
  }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetches_profile() {
  let (url, _) = spawn_fake().await;
  let backend = client(&url, KEY);
  let profile = backend.get_profile("baby1").await.unwrap().unwrap();
  assert_eq!(profile.name, "Lily");
  assert_eq!(profile.date_of_birth.unwrap().to_string(), "2023-04-01");
  assert!(backend.get_profile("nobody").await.unwrap().is_none());
}

// ─── Media ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn photos_are_filtered_by_id_set_and_owner() {
  let (url, fake) = spawn_fake().await;
  let rows = client(&url, KEY)
    .list_photos(&owned(&["p1", "p2", "p3"]), "baby1")
    .await
    .unwrap();
  let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, ["p1", "p2"]);
  assert_eq!(
    rows[0].storage_url.as_deref(),
    Some("https://x.supabase.co/storage/v1/object/p1.jpg")
  );
  assert!(rows[1].timestamp.is_null());

  let selects = fake.selects.lock().unwrap();
  let (table, params) = selects.last().unwrap();
  assert_eq!(table, "photos");
  assert_eq!(params["id"], r#"in.("p1","p2","p3")"#);
  assert_eq!(params["baby_id"], "eq.baby1");
  assert_eq!(params["select"], "id,uri,storage_url,title,timestamp,baby_id");
}

#[tokio::test]
async fn documents_are_listed() {
  let (url, _) = spawn_fake().await;
  let rows = client(&url, KEY)
    .list_documents(&owned(&["d1"]), "baby1")
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].title.as_deref(), Some("Birth certificate"));
}

#[tokio::test]
async fn document_server_error_is_reported() {
  let (url, _) = spawn_fake().await;
  let err = client(&url, KEY)
    .list_documents(&owned(&["d1"]), "broken")
    .await
    .unwrap_err();
  match err {
    Error::Status { table, status, message } => {
      assert_eq!(table, "pdfs");
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(message, "pdfs is on fire");
    }
    other => panic!("unexpected error: {other}"),
  }
}

// ─── View counter ────────────────────────────────────────────────────────────

#[tokio::test]
async fn increment_calls_rpc_with_album_id() {
  let (url, fake) = spawn_fake().await;
  client(&url, KEY)
    .increment_view_count("album1")
    .await
    .unwrap();
  let bodies = fake.rpc_bodies.lock().unwrap();
  assert_eq!(bodies.as_slice(), [json!({ "album_id": "album1" })]);
}
