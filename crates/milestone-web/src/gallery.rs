//! The photo grid and its full-screen viewer.
//!
//! Only photo-kind assets go into the grid and the viewer's slide list.
//! Documents are listed separately as links. Nothing here touches the
//! network; it works on the assets the page already fetched.
//!
//! The viewer is driven by the `photo` query parameter, so every
//! open/next/previous/close action is a plain link.

use milestone_core::{
  asset::{Asset, MediaItem},
  policy::StoragePolicy,
};

use crate::{error::Error, html::HtmlWriter};

/// [`Lightbox::position`] of a closed viewer.
pub const CLOSED: isize = -1;

// ─── Viewer state ────────────────────────────────────────────────────────────

/// Which slide, if any, the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
  len:   usize,
  index: Option<usize>,
}

impl Lightbox {
  /// A closed viewer over `len` slides.
  pub fn new(len: usize) -> Self { Self { len, index: None } }

  /// Restore viewer state from the raw `photo` query parameter. Anything that
  /// is not a valid slide index leaves the viewer closed.
  pub fn from_param(len: usize, param: Option<&str>) -> Self {
    let mut lightbox = Self::new(len);
    if let Some(index) = param.and_then(|p| p.trim().parse::<usize>().ok()) {
      lightbox.open(index);
    }
    lightbox
  }

  /// Open at `index`. Returns `false` (and stays as it was) when out of range.
  pub fn open(&mut self, index: usize) -> bool {
    if index >= self.len {
      return false;
    }
    self.index = Some(index);
    true
  }

  pub fn close(&mut self) { self.index = None; }

  /// Advance one slide, wrapping to the first.
  pub fn next(&mut self) {
    if let Some(i) = self.index {
      self.index = Some((i + 1) % self.len);
    }
  }

  /// Go back one slide, wrapping to the last.
  pub fn prev(&mut self) {
    if let Some(i) = self.index {
      self.index = Some((i + self.len - 1) % self.len);
    }
  }

  pub fn index(&self) -> Option<usize> { self.index }

  /// The index as a signed position, [`CLOSED`] when closed.
  pub fn position(&self) -> isize {
    self.index.map_or(CLOSED, |i| i as isize)
  }

  pub fn is_open(&self) -> bool { self.index.is_some() }

  pub fn len(&self) -> usize { self.len }

  pub fn is_empty(&self) -> bool { self.len == 0 }
}

// ─── Gallery ─────────────────────────────────────────────────────────────────

/// One viewer slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide<'a> {
  pub src: &'a str,
  pub alt: &'a str,
}

#[derive(Debug)]
pub struct Gallery<'a> {
  photos:    Vec<&'a MediaItem>,
  documents: Vec<&'a MediaItem>,
  lightbox:  Lightbox,
}

impl<'a> Gallery<'a> {
  /// Split `assets` into grid photos and listed documents, keeping their
  /// order. Assets whose URI falls outside trusted storage are left out.
  pub fn new(assets: &'a [Asset], policy: &StoragePolicy) -> Self {
    let mut photos = Vec::new();
    let mut documents = Vec::new();
    for asset in assets {
      let item = asset.item();
      if !policy.allows(&item.uri) {
        tracing::warn!(
          asset_id = %item.id,
          kind = asset.kind().as_str(),
          "asset uri outside trusted storage; not rendered"
        );
        continue;
      }
      match asset {
        Asset::Photo(item) => photos.push(item),
        Asset::Document(item) => documents.push(item),
      }
    }
    let lightbox = Lightbox::new(photos.len());
    Self {
      photos,
      documents,
      lightbox,
    }
  }

  /// Open the viewer according to the `photo` query parameter.
  pub fn with_viewer(mut self, param: Option<&str>) -> Self {
    self.lightbox = Lightbox::from_param(self.photos.len(), param);
    self
  }

  pub fn photos(&self) -> &[&'a MediaItem] { &self.photos }

  pub fn documents(&self) -> &[&'a MediaItem] { &self.documents }

  pub fn lightbox(&self) -> Lightbox { self.lightbox }

  /// Nothing survived the storage policy.
  pub fn is_empty(&self) -> bool {
    self.photos.is_empty() && self.documents.is_empty()
  }

  pub fn slides(&self) -> Vec<Slide<'a>> {
    self
      .photos
      .iter()
      .map(|p| Slide {
        src: p.uri.as_str(),
        alt: p.title.as_str(),
      })
      .collect()
  }

  /// Render the grid, the document list and, when open, the viewer.
  /// `base_path` is the album page path the links point back to.
  pub fn render(&self, w: &mut HtmlWriter, base_path: &str) -> Result<(), Error> {
    if !self.photos.is_empty() {
      self.render_grid(w, base_path)?;
    }
    if !self.documents.is_empty() {
      self.render_documents(w)?;
    }
    if self.lightbox.is_open() {
      self.render_viewer(w, base_path)?;
    }
    Ok(())
  }

  fn render_grid(&self, w: &mut HtmlWriter, base_path: &str) -> Result<(), Error> {
    w.open("div", &[("class", "grid")])?;
    for (index, photo) in self.photos.iter().enumerate() {
      let href = slide_href(base_path, index);
      w.open("a", &[("class", "cell"), ("href", href.as_str())])?;
      w.void("img", &[
        ("src", photo.uri.as_str()),
        ("alt", photo.title.as_str()),
        ("loading", "lazy"),
      ])?;
      w.open("div", &[("class", "caption")])?;
      w.element("p", &[("class", "caption-title")], &photo.title)?;
      w.element("p", &[("class", "caption-date")], &short_date(photo))?;
      w.close("div")?;
      w.close("a")?;
    }
    w.close("div")
  }

  fn render_documents(&self, w: &mut HtmlWriter) -> Result<(), Error> {
    w.open("section", &[("class", "documents")])?;
    w.element("h2", &[], "Documents")?;
    w.open("ul", &[])?;
    for doc in &self.documents {
      w.open("li", &[])?;
      w.element(
        "a",
        &[("href", doc.uri.as_str()), ("rel", "noopener noreferrer")],
        &doc.title,
      )?;
      w.element("span", &[("class", "caption-date")], &short_date(doc))?;
      w.close("li")?;
    }
    w.close("ul")?;
    w.close("section")
  }

  fn render_viewer(&self, w: &mut HtmlWriter, base_path: &str) -> Result<(), Error> {
    let Some(index) = self.lightbox.index() else {
      return Ok(());
    };
    let photo = self.photos[index];

    w.open("div", &[
      ("class", "lightbox"),
      ("role", "dialog"),
      ("aria-modal", "true"),
    ])?;
    w.element(
      "a",
      &[("class", "close"), ("href", base_path), ("aria-label", "Close")],
      "\u{00d7}",
    )?;
    if self.lightbox.len() > 1 {
      let mut prev = self.lightbox;
      prev.prev();
      let href = slide_href(base_path, prev.position() as usize);
      w.element(
        "a",
        &[("class", "prev"), ("href", href.as_str()), ("aria-label", "Previous")],
        "\u{2039}",
      )?;
    }
    w.open("figure", &[])?;
    w.void("img", &[("src", photo.uri.as_str()), ("alt", photo.title.as_str())])?;
    w.element(
      "figcaption",
      &[],
      &format!("{} ({} / {})", photo.title, index + 1, self.lightbox.len()),
    )?;
    w.close("figure")?;
    if self.lightbox.len() > 1 {
      let mut next = self.lightbox;
      next.next();
      let href = slide_href(base_path, next.position() as usize);
      w.element(
        "a",
        &[("class", "next"), ("href", href.as_str()), ("aria-label", "Next")],
        "\u{203a}",
      )?;
    }
    w.close("div")
  }
}

fn slide_href(base_path: &str, index: usize) -> String {
  format!("{base_path}?photo={index}")
}

/// `M/D/YYYY`
pub(crate) fn short_date(item: &MediaItem) -> String {
  item.timestamp.format("%-m/%-d/%Y").to_string()
}
