//! HTML generation on top of `quick-xml`'s writer.
//!
//! Element text is escaped with `partial_escape` (`<`, `>`, `&`); attribute
//! values get full escaping from `quick-xml`. Void elements (`img`, `meta`)
//! are written self-closed, every other element always gets a closing tag.

use std::io::Cursor;

use quick_xml::{
  Writer,
  escape::partial_escape,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::Error;

pub type Attrs<'a> = &'a [(&'a str, &'a str)];

pub struct HtmlWriter {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl HtmlWriter {
  /// Start a document with the HTML5 doctype.
  pub fn document() -> Result<Self, Error> {
    let mut w = Self {
      writer: Writer::new(Cursor::new(Vec::new())),
    };
    w.write(Event::DocType(BytesText::from_escaped("html")))?;
    Ok(w)
  }

  fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
    self
      .writer
      .write_event(event)
      .map_err(|e| Error::Render(e.to_string()))
  }

  pub fn open(&mut self, tag: &str, attrs: Attrs<'_>) -> Result<(), Error> {
    let el = BytesStart::new(tag).with_attributes(attrs.iter().copied());
    self.write(Event::Start(el))
  }

  pub fn close(&mut self, tag: &str) -> Result<(), Error> {
    self.write(Event::End(BytesEnd::new(tag)))
  }

  pub fn text(&mut self, text: &str) -> Result<(), Error> {
    let escaped = partial_escape(text);
    self.write(Event::Text(BytesText::from_escaped(escaped)))
  }

  /// `<tag attrs>text</tag>`
  pub fn element(
    &mut self,
    tag: &str,
    attrs: Attrs<'_>,
    text: &str,
  ) -> Result<(), Error> {
    self.open(tag, attrs)?;
    self.text(text)?;
    self.close(tag)
  }

  /// A void element such as `img` or `meta`.
  pub fn void(&mut self, tag: &str, attrs: Attrs<'_>) -> Result<(), Error> {
    let el = BytesStart::new(tag).with_attributes(attrs.iter().copied());
    self.write(Event::Empty(el))
  }

  /// Write trusted, already-valid markup verbatim (stylesheets, entities).
  pub fn raw(&mut self, markup: &str) -> Result<(), Error> {
    self.write(Event::Text(BytesText::from_escaped(markup)))
  }

  pub fn finish(self) -> Result<String, Error> {
    let bytes = self.writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
  }
}
