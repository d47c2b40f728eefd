//! Error type for `milestone-supabase`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The backend answered with a non-success status.
  #[error("{table} returned {status}: {message}")]
  Status {
    table:   String,
    status:  reqwest::StatusCode,
    message: String,
  },

  /// A single-row query matched more than one row.
  #[error("expected at most one row from {table}, got {count}")]
  MultipleRows { table: &'static str, count: usize },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
