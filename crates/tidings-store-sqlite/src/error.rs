//! Error type for `tidings-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A `kind` column value no variant of `NotificationKind` maps to.
  #[error("unknown notification kind in storage: {0:?}")]
  UnknownKind(String),

  #[error("unknown target kind in storage: {0:?}")]
  UnknownTargetKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
