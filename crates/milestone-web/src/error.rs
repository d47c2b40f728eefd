//! Error types and axum `IntoResponse` implementation.
//!
//! Backend failures never reach this type; they are absorbed by the service
//! layer in `milestone-core`.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(String),
  #[error("render error: {0}")]
  Render(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    tracing::error!(error = %self, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
  }
}
