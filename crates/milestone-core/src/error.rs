//! Error types for `milestone-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Injected by [`crate::memory::MemoryBackend`] for a failing collection.
  #[error("backend unavailable: {0}")]
  Unavailable(String),

  #[error("invalid storage url: {0}")]
  Url(#[from] url::ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
