//! Notification — the aggregated record of triggering events.
//!
//! One row represents every event of the same kind on the same target for
//! one recipient. New events fold into the existing row at write time; the
//! actor list grows, a brand-new row is only created for a fresh
//! `(recipient, target, kind)` tuple.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{kind::NotificationKind, target::TargetRef};

/// Someone who triggered a notification. The display name is captured from
/// the triggering event so rendering needs no person lookup later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub id:   Uuid,
  pub name: String,
}

impl Actor {
  pub fn new(id: Uuid, name: impl Into<String>) -> Self {
    Self { id, name: name.into() }
  }
}

/// A persisted notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub id:         Uuid,
  /// The identity that owns this notification. Never changes.
  pub recipient:  Uuid,
  pub target:     TargetRef,
  pub kind:       NotificationKind,
  /// Arrival order, deduplicated by actor id.
  pub actors:     Vec<Actor>,
  /// `true` until the recipient (or a bulk operation) marks it read; a new
  /// triggering event flips it back to `true`.
  pub unread:     bool,
  pub created_at: DateTime<Utc>,
  /// Bumped whenever the row is touched: new actor, read-state change.
  pub updated_at: DateTime<Utc>,
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// A triggering event emitted by an external producer (comment, like, share
/// creators). Input to [`crate::store::NotificationStore::record_event`].
/// Timestamps are always assigned by the store, never accepted from callers.
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub recipient: Uuid,
  pub actor:     Actor,
  pub target:    TargetRef,
  pub kind:      NotificationKind,
}

impl NewEvent {
  pub fn new(
    recipient: Uuid,
    actor: Actor,
    target: TargetRef,
    kind: NotificationKind,
  ) -> Self {
    Self { recipient, actor, target, kind }
  }
}
