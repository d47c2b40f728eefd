//! Album resolution and asset aggregation.
//!
//! This is the data-access boundary: every backend error is logged here and
//! converted into an absent or partial result. Callers only ever branch on
//! whether data is present.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
  album::{Album, SubjectProfile, Visibility},
  asset::{Asset, merge_timeline},
  backend::AlbumBackend,
};

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Resolve a share token to a visible album, or `None`.
///
/// Missing, inactive, expired and failed lookups are indistinguishable to the
/// caller; only the logs tell them apart.
pub async fn resolve_album<B: AlbumBackend>(
  backend: &B,
  token: &str,
) -> Option<Album> {
  resolve_album_at(backend, token, Utc::now()).await
}

/// [`resolve_album`] evaluated against an explicit `now`.
pub async fn resolve_album_at<B: AlbumBackend>(
  backend: &B,
  token: &str,
  now: DateTime<Utc>,
) -> Option<Album> {
  let album = match backend.find_album_by_token(token).await {
    Ok(Some(album)) => album,
    Ok(None) => {
      tracing::debug!("no active album for share token");
      return None;
    }
    Err(e) => {
      tracing::error!(error = %e, "album lookup failed");
      return None;
    }
  };

  match album.visibility_at(now) {
    Visibility::Visible => Some(album),
    Visibility::Inactive => {
      tracing::warn!(album_id = %album.id, "backend returned an inactive album");
      None
    }
    Visibility::Expired { at } => {
      tracing::info!(album_id = %album.id, expired_at = %at, "album expired");
      None
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Fetch the album subject's profile. Failures degrade to `None`.
pub async fn fetch_profile<B: AlbumBackend>(
  backend: &B,
  id: &str,
) -> Option<SubjectProfile> {
  match backend.get_profile(id).await {
    Ok(profile) => profile,
    Err(e) => {
      tracing::error!(error = %e, profile_id = %id, "profile lookup failed");
      None
    }
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Fetch photos and documents for `asset_ids` owned by `owner_id` and merge
/// them newest first.
///
/// A failing collection is skipped; if both fail the result is empty. Rows
/// that do not match the requested ids and owner are discarded even if the
/// backend returned them.
pub async fn aggregate_assets<B: AlbumBackend>(
  backend: &B,
  asset_ids: &[String],
  owner_id: &str,
) -> Vec<Asset> {
  if asset_ids.is_empty() {
    return Vec::new();
  }

  let (photos, documents) = tokio::join!(
    backend.list_photos(asset_ids, owner_id),
    backend.list_documents(asset_ids, owner_id),
  );
  let fetched_at = Utc::now();
  let wanted: HashSet<&str> = asset_ids.iter().map(String::as_str).collect();

  let photos = match photos {
    Ok(rows) => rows
      .into_iter()
      .filter_map(|row| {
        let id = row.id.clone();
        let asset = row.into_asset(fetched_at);
        if asset.is_none() {
          tracing::warn!(asset_id = %id, "photo has no usable uri");
        }
        asset
      })
      .collect(),
    Err(e) => {
      tracing::warn!(error = %e, "photo fetch failed; continuing without photos");
      Vec::new()
    }
  };
  let documents = match documents {
    Ok(rows) => rows
      .into_iter()
      .filter_map(|row| {
        let id = row.id.clone();
        let asset = row.into_asset(fetched_at);
        if asset.is_none() {
          tracing::warn!(asset_id = %id, "document has no storage url");
        }
        asset
      })
      .collect(),
    Err(e) => {
      tracing::warn!(
        error = %e,
        "document fetch failed; continuing without documents"
      );
      Vec::new()
    }
  };

  let mut assets = merge_timeline(photos, documents);
  assets.retain(|asset| {
    let item = asset.item();
    let keep = item.owner_id == owner_id && wanted.contains(item.id.as_str());
    if !keep {
      tracing::warn!(
        asset_id = %item.id,
        kind = asset.kind().as_str(),
        "discarding asset outside the album"
      );
    }
    keep
  });
  assets
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// Everything the album page renders.
#[derive(Debug, Clone)]
pub struct AlbumPage {
  pub album:   Album,
  /// `None` when the profile is missing or its fetch failed.
  pub profile: Option<SubjectProfile>,
  pub assets:  Vec<Asset>,
}

/// Resolve `token`, then fetch the profile and the assets concurrently.
pub async fn load_album_page<B: AlbumBackend>(
  backend: &B,
  token: &str,
) -> Option<AlbumPage> {
  let album = resolve_album(backend, token).await?;
  let (profile, assets) = tokio::join!(
    fetch_profile(backend, &album.baby_id),
    aggregate_assets(backend, &album.asset_ids, &album.baby_id),
  );
  Some(AlbumPage { album, profile, assets })
}
