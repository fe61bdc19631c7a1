//! Error types for `tidings-core`.
//!
//! This is the taxonomy the service layer exposes to transports. Ownership
//! violations are resolved here and never reach the raw query layer; a
//! `Forbidden` row must be rendered to the caller exactly like a missing one.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("notification not found: {0}")]
  NotFound(Uuid),

  /// The notification exists but belongs to another recipient. The row is
  /// left untouched and its state is not revealed.
  #[error("notification {0} belongs to another recipient")]
  Forbidden(Uuid),

  /// The backing store failed. Non-retryable within the request.
  #[error("storage unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
