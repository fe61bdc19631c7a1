//! The notification service: ownership, filtering, pagination, counts.
//!
//! Transport layers hand every call the recipient it acts for. Filter
//! values arrive as untrusted strings and degrade permissively: an
//! unrecognised kind or show value means "no filter", since this is a read
//! path feeding a UI.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use tidings_core::{
  Error, Result,
  kind::NotificationKind,
  notification::{NewEvent, Notification},
  store::{DEFAULT_PER_PAGE, NotificationQuery, NotificationStore},
  target::TargetRegistry,
};

use crate::aggregate::{DisplayNotification, aggregate};

// ─── Request/response types ──────────────────────────────────────────────────

/// Untrusted list parameters as they arrive from a transport layer.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
  /// snake_case kind name; unknown values mean "no filter".
  pub kind:     Option<String>,
  /// `Some("unread")` restricts to unread rows; anything else is ignored.
  pub show:     Option<String>,
  pub page:     Option<u32>,
  pub per_page: Option<u32>,
}

/// Body of the counts operation — serialises to exactly
/// `{"notifications":<n>}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadCounts {
  pub notifications: u64,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct NotificationService<S, R> {
  store:    Arc<S>,
  registry: Arc<R>,
}

impl<S, R> NotificationService<S, R>
where
  S: NotificationStore,
  R: TargetRegistry,
{
  pub fn new(store: Arc<S>, registry: Arc<R>) -> Self {
    Self { store, registry }
  }

  /// Consume one triggering event from a producer.
  pub async fn record_event(&self, event: NewEvent) -> Result<Notification> {
    let notification =
      self.store.record_event(event).await.map_err(unavailable)?;
    tracing::debug!(
      id = %notification.id,
      kind = notification.kind.as_str(),
      actors = notification.actors.len(),
      "notification recorded"
    );
    Ok(notification)
  }

  /// List one page of the recipient's notifications as display units.
  pub async fn list(
    &self,
    recipient: Uuid,
    request:   &ListRequest,
  ) -> Result<Vec<DisplayNotification>> {
    let query = normalize(request);
    let page = self
      .store
      .find_by_recipient(recipient, &query)
      .await
      .map_err(unavailable)?;
    aggregate(&page, self.registry.as_ref(), Utc::now()).await
  }

  /// Unread counts for the recipient. Always succeeds, defaulting to 0.
  pub async fn counts(&self, recipient: Uuid) -> Result<UnreadCounts> {
    let notifications =
      self.store.count_unread(recipient).await.map_err(unavailable)?;
    Ok(UnreadCounts { notifications })
  }

  /// Set one notification's read state. Absent `unread` means mark read.
  ///
  /// A row owned by someone else yields [`Error::Forbidden`] with nothing
  /// mutated or revealed; transports must render it exactly like
  /// [`Error::NotFound`].
  pub async fn set_read_state(
    &self,
    recipient: Uuid,
    id:        Uuid,
    unread:    Option<bool>,
  ) -> Result<()> {
    let unread = unread.unwrap_or(false);

    let notification = self
      .store
      .find_by_id(id)
      .await
      .map_err(unavailable)?
      .ok_or(Error::NotFound(id))?;
    if notification.recipient != recipient {
      return Err(Error::Forbidden(id));
    }

    self
      .store
      .set_read_state(id, recipient, unread)
      .await
      .map_err(unavailable)?;
    Ok(())
  }

  /// Mark everything matching the (optional) kind filter as read. Returns
  /// the number of rows that changed state; callers use it to decide where
  /// to send the user next.
  pub async fn read_all(
    &self,
    recipient: Uuid,
    kind:      Option<&str>,
  ) -> Result<u64> {
    let kind = kind.and_then(NotificationKind::parse);
    let affected = self
      .store
      .mark_all_read(recipient, kind)
      .await
      .map_err(unavailable)?;
    tracing::debug!(%recipient, affected, "marked notifications read");
    Ok(affected)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn unavailable<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Unavailable(Box::new(e))
}

/// Turn untrusted list parameters into a store query: permissive filters,
/// defaulted pagination, positive-integer page sizes only.
fn normalize(request: &ListRequest) -> NotificationQuery {
  NotificationQuery {
    kind:        request.kind.as_deref().and_then(NotificationKind::parse),
    unread_only: request.show.as_deref() == Some("unread"),
    page:        match request.page {
      Some(page) if page >= 1 => page,
      _ => 1,
    },
    per_page:    match request.per_page {
      Some(per_page) if per_page >= 1 => per_page,
      _ => DEFAULT_PER_PAGE,
    },
  }
}
