//! Display-ready media assets.
//!
//! Photos and documents live in two unrelated upstream collections with
//! slightly different columns. Both are normalised into a [`MediaItem`] and
//! tagged with their kind, so the page can merge them into one timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{DocumentRow, PhotoRow};

pub const DEFAULT_PHOTO_TITLE: &str = "Photo";
pub const DEFAULT_DOCUMENT_TITLE: &str = "Document";

// ─── Types ───────────────────────────────────────────────────────────────────

/// The shape shared by every asset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
  pub id:        String,
  /// Resolved, directly fetchable URI.
  pub uri:       String,
  pub title:     String,
  pub timestamp: DateTime<Utc>,
  pub owner_id:  String,
}

/// A normalised asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Asset {
  Photo(MediaItem),
  Document(MediaItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
  Photo,
  Document,
}

impl AssetKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Photo => "photo",
      Self::Document => "document",
    }
  }
}

impl Asset {
  pub fn item(&self) -> &MediaItem {
    match self {
      Self::Photo(item) | Self::Document(item) => item,
    }
  }

  pub fn kind(&self) -> AssetKind {
    match self {
      Self::Photo(_) => AssetKind::Photo,
      Self::Document(_) => AssetKind::Document,
    }
  }

  pub fn is_photo(&self) -> bool { matches!(self, Self::Photo(_)) }

  pub fn id(&self) -> &str { &self.item().id }

  pub fn timestamp(&self) -> DateTime<Utc> { self.item().timestamp }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Interpret a raw timestamp as epoch milliseconds, substituting `fallback`
/// for anything that is not a representable number.
pub fn normalize_timestamp(
  raw: &serde_json::Value,
  fallback: DateTime<Utc>,
) -> DateTime<Utc> {
  let millis = match raw {
    serde_json::Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
    _ => None,
  };
  millis
    .and_then(DateTime::from_timestamp_millis)
    .unwrap_or(fallback)
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

impl PhotoRow {
  /// Normalise into an [`Asset::Photo`]. Returns `None` when the row carries
  /// neither a storage URL nor a raw URI.
  pub fn into_asset(self, fetched_at: DateTime<Utc>) -> Option<Asset> {
    let uri = non_empty(self.storage_url).or_else(|| non_empty(self.uri))?;
    Some(Asset::Photo(MediaItem {
      id: self.id,
      uri,
      title: non_empty(self.title)
        .unwrap_or_else(|| DEFAULT_PHOTO_TITLE.to_owned()),
      timestamp: normalize_timestamp(&self.timestamp, fetched_at),
      owner_id: self.baby_id,
    }))
  }
}

impl DocumentRow {
  /// Normalise into an [`Asset::Document`]. Returns `None` without a storage
  /// URL.
  pub fn into_asset(self, fetched_at: DateTime<Utc>) -> Option<Asset> {
    let uri = non_empty(self.storage_url)?;
    Some(Asset::Document(MediaItem {
      id: self.id,
      uri,
      title: non_empty(self.title)
        .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_owned()),
      timestamp: normalize_timestamp(&self.timestamp, fetched_at),
      owner_id: self.baby_id,
    }))
  }
}

/// Concatenate photos then documents and order newest first. The sort is
/// stable, so equal timestamps keep their fetch order.
pub fn merge_timeline(photos: Vec<Asset>, documents: Vec<Asset>) -> Vec<Asset> {
  let mut assets: Vec<Asset> = photos.into_iter().chain(documents).collect();
  assets.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
  assets
}
