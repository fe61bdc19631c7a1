//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The actor list is stored as
//! compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use tidings_core::{
  kind::NotificationKind,
  notification::{Actor, Notification},
  target::{TargetKind, TargetRef},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NotificationKind ────────────────────────────────────────────────────────

pub fn encode_kind(k: NotificationKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<NotificationKind> {
  NotificationKind::parse(s).ok_or_else(|| Error::UnknownKind(s.to_owned()))
}

// ─── TargetKind ──────────────────────────────────────────────────────────────

pub fn encode_target_kind(k: TargetKind) -> &'static str {
  match k {
    TargetKind::Post => "post",
    TargetKind::Person => "person",
  }
}

pub fn decode_target_kind(s: &str) -> Result<TargetKind> {
  match s {
    "post" => Ok(TargetKind::Post),
    "person" => Ok(TargetKind::Person),
    other => Err(Error::UnknownTargetKind(other.to_owned())),
  }
}

// ─── Actors ──────────────────────────────────────────────────────────────────

pub fn encode_actors(actors: &[Actor]) -> Result<String> {
  Ok(serde_json::to_string(actors)?)
}

pub fn decode_actors(s: &str) -> Result<Vec<Actor>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub recipient_id:    String,
  pub target_kind:     String,
  pub target_id:       String,
  pub kind:            String,
  pub actors:          String,
  pub unread:          bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:         decode_uuid(&self.notification_id)?,
      recipient:  decode_uuid(&self.recipient_id)?,
      target:     TargetRef {
        kind: decode_target_kind(&self.target_kind)?,
        id:   decode_uuid(&self.target_id)?,
      },
      kind:       decode_kind(&self.kind)?,
      actors:     decode_actors(&self.actors)?,
      unread:     self.unread,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawNotification`] field order.
pub const NOTIFICATION_COLUMNS: &str = "notification_id, recipient_id, \
   target_kind, target_id, kind, actors, unread, created_at, updated_at";

/// Map a full `notifications` row (selected with [`NOTIFICATION_COLUMNS`])
/// into a [`RawNotification`].
pub fn raw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    notification_id: row.get(0)?,
    recipient_id:    row.get(1)?,
    target_kind:     row.get(2)?,
    target_id:       row.get(3)?,
    kind:            row.get(4)?,
    actors:          row.get(5)?,
    unread:          row.get(6)?,
    created_at:      row.get(7)?,
    updated_at:      row.get(8)?,
  })
}
