//! Full-page renderers: the album page and the not-found page.

use milestone_core::service::AlbumPage;

use crate::{error::Error, gallery::Gallery, html::HtmlWriter, meta::PageMeta};

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;color:#111827;\
background:linear-gradient(135deg,#fdf2f8,#ffffff,#eff6ff);min-height:100vh}\
.wrap{max-width:80rem;margin:0 auto;padding:1.5rem 1rem}\
header{background:#fff;box-shadow:0 1px 2px rgba(0,0,0,.05);position:sticky;top:0;z-index:10}\
h1{font-size:1.875rem;margin:0}\
.subject{font-size:1.125rem;color:#4b5563;margin:.25rem 0 0}\
.top{display:flex;align-items:center;justify-content:space-between}\
.muted{font-size:.875rem;color:#6b7280}\
.stats{display:flex;gap:1rem;margin-top:1rem}\
.grid{display:grid;gap:1rem;grid-template-columns:repeat(2,1fr)}\
@media (min-width:768px){.grid{grid-template-columns:repeat(3,1fr)}}\
@media (min-width:1024px){.grid{grid-template-columns:repeat(4,1fr)}}\
.cell{position:relative;aspect-ratio:1;overflow:hidden;border-radius:.5rem;\
box-shadow:0 4px 6px rgba(0,0,0,.1);display:block}\
.cell img{width:100%;height:100%;object-fit:cover;transition:transform .3s}\
.cell:hover img{transform:scale(1.05)}\
.caption{position:absolute;inset:0;display:flex;flex-direction:column;\
justify-content:flex-end;padding:.5rem;opacity:0;transition:opacity .3s;\
background:linear-gradient(to top,rgba(0,0,0,.5),transparent)}\
.cell:hover .caption{opacity:1}\
.caption p{margin:0;color:#fff;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}\
.caption-title{font-size:.875rem;font-weight:500}\
.caption-date{font-size:.75rem;opacity:.8;margin-left:.5rem}\
.documents{margin-top:2rem}\
.empty,.notfound{text-align:center;padding:4rem 0}\
.emoji{font-size:4rem}\
.reasons{background:#fff;border-radius:.5rem;padding:1.5rem;\
box-shadow:0 10px 15px rgba(0,0,0,.1);text-align:left;max-width:28rem;margin:0 auto}\
.lightbox{position:fixed;inset:0;background:rgba(0,0,0,.9);display:flex;\
align-items:center;justify-content:center;z-index:50}\
.lightbox figure{margin:0;text-align:center;color:#fff}\
.lightbox img{max-width:90vw;max-height:85vh}\
.lightbox a{color:#fff;text-decoration:none;font-size:3rem;padding:1rem}\
.lightbox .close{position:absolute;top:0;right:0}\
footer{margin-top:4rem;padding-bottom:2rem;text-align:center}\
";

fn head(w: &mut HtmlWriter, meta: &PageMeta) -> Result<(), Error> {
  w.open("html", &[("lang", "en")])?;
  w.open("head", &[])?;
  w.void("meta", &[("charset", "utf-8")])?;
  w.void("meta", &[
    ("name", "viewport"),
    ("content", "width=device-width, initial-scale=1"),
  ])?;
  meta.write(w)?;
  w.open("style", &[])?;
  w.raw(STYLE)?;
  w.close("style")?;
  w.close("head")
}

fn footer(w: &mut HtmlWriter) -> Result<(), Error> {
  w.open("footer", &[("class", "muted")])?;
  w.open("p", &[])?;
  w.text("Powered by ")?;
  w.element("strong", &[], "Baby Milestone")?;
  w.close("p")?;
  w.element("p", &[], "Beautiful memories, safely shared")?;
  w.close("footer")
}

fn plural_items(n: usize) -> String {
  if n == 1 { "1 item".to_owned() } else { format!("{n} items") }
}

// ─── Album ───────────────────────────────────────────────────────────────────

/// Render the album page. `base_path` is the request path, used for the
/// gallery's viewer links.
pub fn album(
  page: &AlbumPage,
  gallery: &Gallery<'_>,
  base_path: &str,
) -> Result<String, Error> {
  let album = &page.album;
  let meta = PageMeta::for_album(album, page.profile.as_ref());

  let mut w = HtmlWriter::document()?;
  head(&mut w, &meta)?;
  w.open("body", &[])?;

  w.open("header", &[])?;
  w.open("div", &[("class", "wrap")])?;
  w.open("div", &[("class", "top")])?;
  w.open("div", &[])?;
  w.element("h1", &[], &album.name)?;
  if let Some(profile) = &page.profile {
    w.element(
      "p",
      &[("class", "subject")],
      &format!("{}'s Memories", profile.name),
    )?;
  }
  w.close("div")?;
  w.element(
    "span",
    &[("class", "muted views")],
    &format!("{} views", album.view_count),
  )?;
  w.close("div")?;
  if let Some(description) = album.description() {
    w.element("p", &[("class", "description")], description)?;
  }
  w.open("div", &[("class", "stats muted")])?;
  w.element("span", &[("class", "count")], &plural_items(page.assets.len()))?;
  w.element(
    "span",
    &[("class", "created")],
    &format!("Created {}", album.created_at.format("%-m/%-d/%Y")),
  )?;
  w.close("div")?;
  w.close("div")?;
  w.close("header")?;

  w.open("main", &[("class", "wrap")])?;
  if gallery.is_empty() {
    w.open("div", &[("class", "empty")])?;
    w.element("div", &[("class", "emoji")], "\u{1f4f8}")?;
    w.element("h2", &[], "No photos yet")?;
    w.element(
      "p",
      &[("class", "muted")],
      "Photos will appear here once they're added to the album",
    )?;
    w.close("div")?;
  } else {
    gallery.render(&mut w, base_path)?;
  }
  w.close("main")?;

  footer(&mut w)?;
  w.close("body")?;
  w.close("html")?;
  w.finish()
}

// ─── Not found ───────────────────────────────────────────────────────────────

/// The one page shown for missing, inactive, expired and unreadable albums.
pub fn not_found() -> Result<String, Error> {
  let mut w = HtmlWriter::document()?;
  head(&mut w, &PageMeta::not_found())?;
  w.open("body", &[])?;
  w.open("main", &[("class", "wrap notfound")])?;
  w.element("div", &[("class", "emoji")], "\u{1f50d}")?;
  w.element("h1", &[], "Album Not Found")?;
  w.element(
    "p",
    &[],
    "This album doesn't exist or is no longer available.",
  )?;
  w.open("div", &[("class", "reasons")])?;
  w.element("p", &[("class", "muted")], "Possible reasons:")?;
  w.open("ul", &[])?;
  for reason in [
    "The album link may be incorrect",
    "The album may have been deleted",
    "The album may have expired",
  ] {
    w.element("li", &[], reason)?;
  }
  w.close("ul")?;
  w.close("div")?;
  w.element(
    "p",
    &[("class", "muted")],
    "Contact the person who shared this album for a new link",
  )?;
  w.close("main")?;
  w.close("body")?;
  w.close("html")?;
  w.finish()
}
