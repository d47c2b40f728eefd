//! Shared albums and the subject profiles they belong to.
//!
//! Both are produced upstream; this system only reads them. An album is a
//! capability: whoever holds its `share_token` may view it for as long as it
//! stays active and unexpired.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─── Album ───────────────────────────────────────────────────────────────────

/// A row of the `shared_albums` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
  pub id:              String,
  pub family_group_id: String,
  /// The subject (child profile) every asset in the album must belong to.
  pub baby_id:         String,
  pub created_by:      String,
  pub name:            String,
  #[serde(default)]
  pub description:     Option<String>,
  /// Ordered asset identifiers. Stored either as a JSON array or as a string
  /// holding a JSON-encoded array.
  #[serde(default, deserialize_with = "deserialize_asset_ids")]
  pub asset_ids:       Vec<String>,
  pub share_token:     String,
  #[serde(default)]
  pub view_count:      i64,
  #[serde(default)]
  pub expires_at:      Option<DateTime<Utc>>,
  pub is_active:       bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Whether an album may be shown at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
  Visible,
  Inactive,
  Expired { at: DateTime<Utc> },
}

impl Visibility {
  pub fn is_visible(&self) -> bool { matches!(self, Self::Visible) }
}

impl Album {
  /// An album is visible while active and either unexpiring or expiring
  /// strictly after `now`.
  pub fn visibility_at(&self, now: DateTime<Utc>) -> Visibility {
    if !self.is_active {
      return Visibility::Inactive;
    }
    match self.expires_at {
      Some(at) if at <= now => Visibility::Expired { at },
      _ => Visibility::Visible,
    }
  }

  /// Description with blank strings treated as absent.
  pub fn description(&self) -> Option<&str> {
    self.description.as_deref().filter(|d| !d.trim().is_empty())
  }
}

fn deserialize_asset_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    List(Vec<String>),
    Encoded(String),
  }

  match Option::<Raw>::deserialize(deserializer)? {
    None => Ok(Vec::new()),
    Some(Raw::List(ids)) => Ok(ids),
    Some(Raw::Encoded(s)) => {
      serde_json::from_str(&s).map_err(serde::de::Error::custom)
    }
  }
}

// ─── Subject profile ─────────────────────────────────────────────────────────

/// A row of the `babies` collection, reduced to the fields the viewer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
  pub id:            String,
  pub name:          String,
  #[serde(default)]
  pub date_of_birth: Option<NaiveDate>,
}
