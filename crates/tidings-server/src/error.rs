//! Error type and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request did not name a (well-formed) recipient identity.
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found")]
  NotFound,

  #[error("service error: {0}")]
  Service(#[source] tidings_core::Error),
}

impl From<tidings_core::Error> for Error {
  fn from(e: tidings_core::Error) -> Self {
    match e {
      // A row owned by someone else must look exactly like a missing one.
      tidings_core::Error::NotFound(_) | tidings_core::Error::Forbidden(_) => {
        Error::NotFound
      }
      other => Error::Service(other),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
      Error::Service(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
