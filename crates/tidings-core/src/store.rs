//! The `NotificationStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `tidings-store-sqlite`). Higher layers (`tidings-service`,
//! `tidings-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  kind::NotificationKind,
  notification::{NewEvent, Notification},
};

/// Page size used when the caller supplies none, or an invalid one.
pub const DEFAULT_PER_PAGE: u32 = 25;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`NotificationStore::find_by_recipient`].
///
/// Every query is recipient-scoped by construction; there is no way to ask
/// the store for another user's rows through this type.
#[derive(Debug, Clone)]
pub struct NotificationQuery {
  /// Restrict to one kind.
  pub kind:        Option<NotificationKind>,
  /// Only rows still unread.
  pub unread_only: bool,
  /// 1-based page number. Pages past the end are empty results, not errors.
  pub page:        u32,
  pub per_page:    u32,
}

impl Default for NotificationQuery {
  fn default() -> Self {
    Self {
      kind:        None,
      unread_only: false,
      page:        1,
      per_page:    DEFAULT_PER_PAGE,
    }
  }
}

impl NotificationQuery {
  /// Row offset of the first item on the requested page.
  pub fn offset(&self) -> u64 {
    (u64::from(self.page.max(1)) - 1) * u64::from(self.per_page)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Tidings notification store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NotificationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Consume one triggering event.
  ///
  /// Upsert keyed exactly on `(recipient, target, kind)`: an existing row
  /// gains the actor (if not already present), a bumped `updated_at`, and
  /// `unread = true`; otherwise a fresh unread row is created. Returns the
  /// row as stored.
  fn record_event(
    &self,
    event: NewEvent,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Fetch a notification by id regardless of recipient. Returns `None` if
  /// not found. Callers enforce ownership before revealing or mutating
  /// anything.
  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Notification>, Self::Error>> + Send + '_;

  /// Page through a recipient's notifications, most recently updated first.
  fn find_by_recipient<'a>(
    &'a self,
    recipient: Uuid,
    query: &'a NotificationQuery,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + 'a;

  /// Number of unread notifications owned by `recipient`.
  fn count_unread(
    &self,
    recipient: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Set the read state of a single row, scoped to `recipient` in the same
  /// statement: a mismatched recipient affects zero rows and leaks nothing.
  /// Idempotent; bumps `updated_at` whenever the row matches. Returns
  /// whether a row was affected.
  fn set_read_state(
    &self,
    id: Uuid,
    recipient: Uuid,
    unread: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Mark every notification matching `recipient` (and `kind`, if given) as
  /// read in one set-based update over the filter snapshot. Returns the
  /// number of rows that actually changed state; already-read rows are not
  /// counted.
  fn mark_all_read(
    &self,
    recipient: Uuid,
    kind: Option<NotificationKind>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offset_is_zero_based_from_page_one() {
    let query = NotificationQuery { page: 1, per_page: 25, ..Default::default() };
    assert_eq!(query.offset(), 0);

    let query = NotificationQuery { page: 3, per_page: 10, ..Default::default() };
    assert_eq!(query.offset(), 20);
  }

  #[test]
  fn offset_tolerates_page_zero() {
    let query = NotificationQuery { page: 0, per_page: 25, ..Default::default() };
    assert_eq!(query.offset(), 0);
  }
}
