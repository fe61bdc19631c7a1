//! Recipient identity extractor.
//!
//! Authentication happens upstream (reverse proxy, gateway). This layer only
//! requires that each request names the recipient it acts as via the
//! `x-tidings-user` header, and threads that identity explicitly into every
//! service call.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use tidings_core::{store::NotificationStore, target::TargetRegistry};

use crate::{AppState, error::Error};

/// Header carrying the acting recipient's UUID.
pub const USER_HEADER: &str = "x-tidings-user";

/// The recipient a request acts for. Present in a handler's arguments means
/// the header was present and well-formed.
pub struct Recipient(pub Uuid);

impl<S, R> FromRequestParts<AppState<S, R>> for Recipient
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &AppState<S, R>,
  ) -> Result<Self, Self::Rejection> {
    let value = parts
      .headers
      .get(USER_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::Unauthorized)?;

    let id = Uuid::parse_str(value).map_err(|_| Error::Unauthorized)?;
    Ok(Recipient(id))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{body::Body, http::Request};
  use tidings_service::NotificationService;
  use tidings_store_sqlite::{SqliteStore, SqliteTargetRegistry};
  use uuid::Uuid;

  use super::*;

  async fn state() -> AppState<SqliteStore, SqliteTargetRegistry> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let registry = Arc::new(store.registry());
    AppState {
      service: Arc::new(NotificationService::new(Arc::new(store), registry)),
    }
  }

  async fn extract(
    req: Request<Body>,
    state: &AppState<SqliteStore, SqliteTargetRegistry>,
  ) -> Result<Recipient, Error> {
    let (mut parts, _) = req.into_parts();
    Recipient::from_request_parts(&mut parts, state).await
  }

  #[tokio::test]
  async fn well_formed_header() {
    let state = state().await;
    let id = Uuid::new_v4();
    let req = Request::builder()
      .header(USER_HEADER, id.to_string())
      .body(Body::empty())
      .unwrap();

    let Recipient(extracted) = extract(req, &state).await.unwrap();
    assert_eq!(extracted, id);
  }

  #[tokio::test]
  async fn missing_header() {
    let state = state().await;
    let req = Request::builder().body(Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn malformed_header() {
    let state = state().await;
    let req = Request::builder()
      .header(USER_HEADER, "not-a-uuid")
      .body(Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthorized)
    ));
  }
}
