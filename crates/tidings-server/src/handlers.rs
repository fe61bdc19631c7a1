//! Handlers for the `/notifications` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/notifications` | `?page`, `?per_page`, `?type`, `?show=unread`, `?format` |
//! | `PATCH` | `/notifications/{id}` | Body `{"set_unread":bool}` optional; absent means mark read |
//! | `POST`  | `/notifications/read_all` | Optional `?type=` restricts the set |
//! | `GET`   | `/notifications/counts` | `{"notifications":<n>}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tidings_core::{
  kind::NotificationKind, store::NotificationStore, target::TargetRegistry,
};
use tidings_service::{DisplayNotification, ListRequest, UnreadCounts};

use crate::{AppState, error::Error, identity::Recipient};

// ─── Render format ───────────────────────────────────────────────────────────

/// Rendering depth hint. Record selection is identical for every format:
/// `dropdown` trims each record to what the header widget shows, while
/// `mobile` gets the full record (the mobile templates live downstream).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
  #[default]
  Full,
  Dropdown,
  Mobile,
}

impl RenderFormat {
  /// Unknown values fall back to the full rendering.
  fn parse(s: Option<&str>) -> Self {
    match s {
      Some("dropdown") => Self::Dropdown,
      Some("mobile") => Self::Mobile,
      _ => Self::Full,
    }
  }
}

/// The fields the notification dropdown widget renders.
#[derive(Debug, Serialize)]
pub struct CompactNotification {
  pub id:         Uuid,
  pub kind:       NotificationKind,
  pub note:       String,
  pub time_ago:   String,
  pub unread:     bool,
  pub updated_at: DateTime<Utc>,
}

impl From<&DisplayNotification> for CompactNotification {
  fn from(record: &DisplayNotification) -> Self {
    Self {
      id:         record.id,
      kind:       record.kind,
      note:       record.note.clone(),
      time_ago:   record.time_ago.clone(),
      unread:     record.unread,
      updated_at: record.updated_at,
    }
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// Pagination values arrive as raw strings so that malformed input degrades
/// to the defaults instead of failing the read path.
#[derive(Debug, Deserialize)]
pub struct IndexParams {
  pub page:     Option<String>,
  pub per_page: Option<String>,
  #[serde(rename = "type")]
  pub kind:     Option<String>,
  pub show:     Option<String>,
  pub format:   Option<String>,
}

/// `GET /notifications[?page=..][&per_page=..][&type=..][&show=unread][&format=..]`
pub async fn index<S, R>(
  State(state): State<AppState<S, R>>,
  Recipient(recipient): Recipient,
  Query(params): Query<IndexParams>,
) -> Result<Response, Error>
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  let request = ListRequest {
    kind:     params.kind,
    show:     params.show,
    page:     params.page.as_deref().and_then(|s| s.parse().ok()),
    per_page: params.per_page.as_deref().and_then(|s| s.parse().ok()),
  };

  let records = state.service.list(recipient, &request).await?;

  Ok(match RenderFormat::parse(params.format.as_deref()) {
    RenderFormat::Dropdown => {
      let compact: Vec<CompactNotification> =
        records.iter().map(CompactNotification::from).collect();
      Json(compact).into_response()
    }
    RenderFormat::Full | RenderFormat::Mobile => Json(records).into_response(),
  })
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub set_unread: Option<bool>,
}

/// `PATCH /notifications/{id}` — body `{"set_unread":bool}`, optional.
/// An absent body or an absent field both mean "mark read".
pub async fn update<S, R>(
  State(state): State<AppState<S, R>>,
  Recipient(recipient): Recipient,
  Path(id): Path<Uuid>,
  body: Option<Json<UpdateBody>>,
) -> Result<StatusCode, Error>
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  let set_unread = body.and_then(|Json(b)| b.set_unread);
  state.service.set_read_state(recipient, id, set_unread).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Read all ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReadAllParams {
  #[serde(rename = "type")]
  pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
  pub count: u64,
}

/// `POST /notifications/read_all[?type=..]` — returns how many rows actually
/// transitioned to read; the caller decides where to send the user next.
pub async fn read_all<S, R>(
  State(state): State<AppState<S, R>>,
  Recipient(recipient): Recipient,
  Query(params): Query<ReadAllParams>,
) -> Result<Json<ReadAllResponse>, Error>
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  let count = state
    .service
    .read_all(recipient, params.kind.as_deref())
    .await?;
  Ok(Json(ReadAllResponse { count }))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// `GET /notifications/counts` — `{"notifications":<unread count>}`.
pub async fn counts<S, R>(
  State(state): State<AppState<S, R>>,
  Recipient(recipient): Recipient,
) -> Result<Json<UnreadCounts>, Error>
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  Ok(Json(state.service.counts(recipient).await?))
}
