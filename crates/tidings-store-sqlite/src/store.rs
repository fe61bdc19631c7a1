//! [`SqliteStore`] — the SQLite implementation of [`NotificationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tidings_core::{
  kind::NotificationKind,
  notification::{NewEvent, Notification},
  store::{NotificationQuery, NotificationStore},
};

use crate::{
  Error, Result,
  encode::{
    NOTIFICATION_COLUMNS, RawNotification, decode_actors, decode_dt,
    decode_uuid, encode_actors, encode_dt, encode_kind, encode_target_kind,
    encode_uuid, raw_from_row,
  },
  registry::SqliteTargetRegistry,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tidings notification store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// A target registry sharing this store's connection.
  pub fn registry(&self) -> SqliteTargetRegistry {
    SqliteTargetRegistry::new(self.conn.clone())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the aggregate row a new event would fold into, as raw strings:
  /// `(notification_id, actors, created_at)`.
  async fn find_aggregate_row(
    &self,
    event: &NewEvent,
  ) -> Result<Option<(String, String, String)>> {
    let recipient_str   = encode_uuid(event.recipient);
    let target_kind_str = encode_target_kind(event.target.kind).to_owned();
    let target_id_str   = encode_uuid(event.target.id);
    let kind_str        = encode_kind(event.kind).to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT notification_id, actors, created_at FROM notifications
               WHERE recipient_id = ?1 AND target_kind = ?2
                 AND target_id = ?3 AND kind = ?4",
              rusqlite::params![
                recipient_str,
                target_kind_str,
                target_id_str,
                kind_str,
              ],
              |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  /// Insert a fully-built [`Notification`] into the `notifications` table.
  async fn insert_notification(&self, notification: &Notification) -> Result<()> {
    let id_str          = encode_uuid(notification.id);
    let recipient_str   = encode_uuid(notification.recipient);
    let target_kind_str = encode_target_kind(notification.target.kind).to_owned();
    let target_id_str   = encode_uuid(notification.target.id);
    let kind_str        = encode_kind(notification.kind).to_owned();
    let actors_str      = encode_actors(&notification.actors)?;
    let unread          = notification.unread;
    let created_str     = encode_dt(notification.created_at);
    let updated_str     = encode_dt(notification.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             notification_id, recipient_id, target_kind, target_id, kind,
             actors, unread, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            recipient_str,
            target_kind_str,
            target_id_str,
            kind_str,
            actors_str,
            unread,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── NotificationStore impl ──────────────────────────────────────────────────

impl NotificationStore for SqliteStore {
  type Error = Error;

  async fn record_event(&self, event: NewEvent) -> Result<Notification> {
    let existing = self.find_aggregate_row(&event).await?;
    let now = Utc::now();

    match existing {
      Some((id_str, actors_json, created_at_str)) => {
        let id         = decode_uuid(&id_str)?;
        let created_at = decode_dt(&created_at_str)?;

        let mut actors = decode_actors(&actors_json)?;
        if !actors.iter().any(|a| a.id == event.actor.id) {
          actors.push(event.actor.clone());
        }

        let actors_str = encode_actors(&actors)?;
        let now_str    = encode_dt(now);
        self
          .conn
          .call(move |conn| {
            conn.execute(
              "UPDATE notifications SET actors = ?1, unread = 1, updated_at = ?2
               WHERE notification_id = ?3",
              rusqlite::params![actors_str, now_str, id_str],
            )?;
            Ok(())
          })
          .await?;

        Ok(Notification {
          id,
          recipient: event.recipient,
          target: event.target,
          kind: event.kind,
          actors,
          unread: true,
          created_at,
          updated_at: now,
        })
      }
      None => {
        let notification = Notification {
          id:         Uuid::new_v4(),
          recipient:  event.recipient,
          target:     event.target,
          kind:       event.kind,
          actors:     vec![event.actor],
          unread:     true,
          created_at: now,
          updated_at: now,
        };
        self.insert_notification(&notification).await?;
        Ok(notification)
      }
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE notification_id = ?1"
              ),
              rusqlite::params![id_str],
              raw_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNotification::into_notification).transpose()
  }

  async fn find_by_recipient(
    &self,
    recipient: Uuid,
    query:     &NotificationQuery,
  ) -> Result<Vec<Notification>> {
    let recipient_str = encode_uuid(recipient);
    let kind_str      = query.kind.map(encode_kind).map(str::to_owned);
    let unread_only   = query.unread_only;
    let limit_val     = i64::from(query.per_page);
    let offset_val    = query.offset() as i64;

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec!["recipient_id = ?1"];
        if kind_str.is_some() {
          conds.push("kind = ?2");
        }
        if unread_only {
          conds.push("unread = 1");
        }

        let sql = format!(
          "SELECT {NOTIFICATION_COLUMNS} FROM notifications
           WHERE {}
           ORDER BY updated_at DESC, notification_id
           LIMIT ?3 OFFSET ?4",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              recipient_str,
              kind_str.as_deref(),
              limit_val,
              offset_val,
            ],
            raw_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn count_unread(&self, recipient: Uuid) -> Result<u64> {
    let recipient_str = encode_uuid(recipient);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM notifications
           WHERE recipient_id = ?1 AND unread = 1",
          rusqlite::params![recipient_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn set_read_state(
    &self,
    id:        Uuid,
    recipient: Uuid,
    unread:    bool,
  ) -> Result<bool> {
    let id_str        = encode_uuid(id);
    let recipient_str = encode_uuid(recipient);
    let now_str       = encode_dt(Utc::now());

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET unread = ?1, updated_at = ?2
           WHERE notification_id = ?3 AND recipient_id = ?4",
          rusqlite::params![unread, now_str, id_str, recipient_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn mark_all_read(
    &self,
    recipient: Uuid,
    kind:      Option<NotificationKind>,
  ) -> Result<u64> {
    let recipient_str = encode_uuid(recipient);
    let kind_str      = kind.map(encode_kind).map(str::to_owned);
    let now_str       = encode_dt(Utc::now());

    // Already-read rows stay out of the WHERE so the affected count reports
    // only actual transitions.
    let affected = self
      .conn
      .call(move |conn| {
        let n = if let Some(k) = kind_str {
          conn.execute(
            "UPDATE notifications SET unread = 0, updated_at = ?1
             WHERE recipient_id = ?2 AND unread = 1 AND kind = ?3",
            rusqlite::params![now_str, recipient_str, k],
          )?
        } else {
          conn.execute(
            "UPDATE notifications SET unread = 0, updated_at = ?1
             WHERE recipient_id = ?2 AND unread = 1",
            rusqlite::params![now_str, recipient_str],
          )?
        };
        Ok(n)
      })
      .await?;

    Ok(affected as u64)
  }
}
