//! An in-memory [`AlbumBackend`] with the same filter semantics as the real
//! backend, plus switches to make individual collections fail.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
  Error, Result,
  album::{Album, SubjectProfile},
  backend::{AlbumBackend, DocumentRow, PhotoRow},
};

/// A collection (or procedure) that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Albums,
  Profiles,
  Photos,
  Documents,
  ViewCounter,
}

#[derive(Debug, Default)]
struct Inner {
  albums:    Vec<Album>,
  profiles:  Vec<SubjectProfile>,
  photos:    Vec<PhotoRow>,
  documents: Vec<DocumentRow>,
  failing:   HashSet<Collection>,
  /// When `false`, media queries ignore their filters and return every row.
  filtering: bool,
  views:     HashMap<String, i64>,
}

/// Cloning shares the underlying data.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
  inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryBackend {
  fn default() -> Self { Self::new() }
}

impl MemoryBackend {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Mutex::new(Inner {
        filtering: true,
        ..Inner::default()
      })),
    }
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn insert_album(&self, album: Album) { self.lock().albums.push(album); }

  pub fn insert_profile(&self, profile: SubjectProfile) {
    self.lock().profiles.push(profile);
  }

  pub fn insert_photo(&self, row: PhotoRow) { self.lock().photos.push(row); }

  pub fn insert_document(&self, row: DocumentRow) {
    self.lock().documents.push(row);
  }

  /// Make every call touching `collection` return [`Error::Unavailable`].
  pub fn fail(&self, collection: Collection) {
    self.lock().failing.insert(collection);
  }

  /// Simulate a misbehaving backend whose media queries ignore filters.
  pub fn disable_filtering(&self) { self.lock().filtering = false; }

  /// Number of increments recorded for `album_id`.
  pub fn view_count(&self, album_id: &str) -> i64 {
    self.lock().views.get(album_id).copied().unwrap_or(0)
  }
}

impl Inner {
  fn check(&self, collection: Collection) -> Result<()> {
    if self.failing.contains(&collection) {
      return Err(Error::Unavailable(format!("{collection:?} is failing")));
    }
    Ok(())
  }
}

impl AlbumBackend for MemoryBackend {
  type Error = Error;

  async fn find_album_by_token(&self, token: &str) -> Result<Option<Album>> {
    let inner = self.lock();
    inner.check(Collection::Albums)?;
    Ok(
      inner
        .albums
        .iter()
        .find(|a| a.share_token == token && a.is_active)
        .cloned(),
    )
  }

  async fn get_profile(&self, id: &str) -> Result<Option<SubjectProfile>> {
    let inner = self.lock();
    inner.check(Collection::Profiles)?;
    Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
  }

  async fn list_photos(
    &self,
    ids: &[String],
    owner_id: &str,
  ) -> Result<Vec<PhotoRow>> {
    let inner = self.lock();
    inner.check(Collection::Photos)?;
    Ok(
      inner
        .photos
        .iter()
        .filter(|p| {
          !inner.filtering || (ids.contains(&p.id) && p.baby_id == owner_id)
        })
        .cloned()
        .collect(),
    )
  }

  async fn list_documents(
    &self,
    ids: &[String],
    owner_id: &str,
  ) -> Result<Vec<DocumentRow>> {
    let inner = self.lock();
    inner.check(Collection::Documents)?;
    Ok(
      inner
        .documents
        .iter()
        .filter(|d| {
          !inner.filtering || (ids.contains(&d.id) && d.baby_id == owner_id)
        })
        .cloned()
        .collect(),
    )
  }

  async fn increment_view_count(&self, album_id: &str) -> Result<()> {
    let mut inner = self.lock();
    inner.check(Collection::ViewCounter)?;
    *inner.views.entry(album_id.to_owned()).or_default() += 1;
    if let Some(album) = inner.albums.iter_mut().find(|a| a.id == album_id) {
      album.view_count += 1;
    }
    Ok(())
  }
}
