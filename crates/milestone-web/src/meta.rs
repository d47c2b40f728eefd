//! `<head>` metadata used by link previews.

use milestone_core::album::{Album, SubjectProfile};

use crate::{error::Error, html::HtmlWriter};

pub const NOT_FOUND_TITLE: &str = "Album Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGraph {
  pub title:       String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
  pub title:       String,
  pub description: Option<String>,
  pub open_graph:  Option<OpenGraph>,
}

impl PageMeta {
  pub fn for_album(album: &Album, profile: Option<&SubjectProfile>) -> Self {
    let name = profile.map(|p| p.name.as_str());
    let description = album.description().map(str::to_owned);
    Self {
      title:       format!("{} - {}'s Album", album.name, name.unwrap_or("Baby")),
      description: Some(description.clone().unwrap_or_else(|| {
        format!("View {}'s shared photo album", name.unwrap_or("baby"))
      })),
      open_graph:  Some(OpenGraph {
        title:       album.name.clone(),
        description: description.unwrap_or_else(|| {
          format!("{}'s memories", name.unwrap_or("Baby"))
        }),
      }),
    }
  }

  pub fn not_found() -> Self {
    Self {
      title:       NOT_FOUND_TITLE.to_owned(),
      description: None,
      open_graph:  None,
    }
  }

  pub fn write(&self, w: &mut HtmlWriter) -> Result<(), Error> {
    w.element("title", &[], &self.title)?;
    if let Some(description) = &self.description {
      w.void("meta", &[
        ("name", "description"),
        ("content", description.as_str()),
      ])?;
    }
    if let Some(og) = &self.open_graph {
      w.void("meta", &[
        ("property", "og:title"),
        ("content", og.title.as_str()),
      ])?;
      w.void("meta", &[
        ("property", "og:description"),
        ("content", og.description.as_str()),
      ])?;
      w.void("meta", &[("property", "og:type"), ("content", "website")])?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn album(description: Option<&str>) -> Album {
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Album {
      id:              "album1".into(),
      family_group_id: "family1".into(),
      baby_id:         "baby1".into(),
      created_by:      "parent1".into(),
      name:            "First Summer".into(),
      description:     description.map(str::to_owned),
      asset_ids:       Vec::new(),
      share_token:     "abc123".into(),
      view_count:      0,
      expires_at:      None,
      is_active:       true,
      created_at:      at,
      updated_at:      at,
    }
  }

  fn lily() -> SubjectProfile {
    SubjectProfile {
      id:            "baby1".into(),
      name:          "Lily".into(),
      date_of_birth: None,
    }
  }

  #[test]
  fn album_with_profile_and_description() {
    let meta = PageMeta::for_album(&album(Some("Beach days")), Some(&lily()));
    assert_eq!(meta.title, "First Summer - Lily's Album");
    assert_eq!(meta.description.as_deref(), Some("Beach days"));
    let og = meta.open_graph.unwrap();
    assert_eq!(og.title, "First Summer");
    assert_eq!(og.description, "Beach days");
  }

  #[test]
  fn fallbacks_without_profile_or_description() {
    let meta = PageMeta::for_album(&album(Some("  ")), None);
    assert_eq!(meta.title, "First Summer - Baby's Album");
    assert_eq!(
      meta.description.as_deref(),
      Some("View baby's shared photo album")
    );
    assert_eq!(meta.open_graph.unwrap().description, "Baby's memories");
  }

  #[test]
  fn generated_description_uses_subject_name() {
    let meta = PageMeta::for_album(&album(None), Some(&lily()));
    assert_eq!(
      meta.description.as_deref(),
      Some("View Lily's shared photo album")
    );
    assert_eq!(meta.open_graph.unwrap().description, "Lily's memories");
  }

  #[test]
  fn not_found_has_only_a_title() {
    let meta = PageMeta::not_found();
    assert_eq!(meta.title, NOT_FOUND_TITLE);
    assert!(meta.description.is_none());
    assert!(meta.open_graph.is_none());
  }
}
