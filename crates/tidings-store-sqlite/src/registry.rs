//! [`SqliteTargetRegistry`] — the SQLite implementation of [`TargetRegistry`].
//!
//! The `targets` table mirrors objects owned by other subsystems. Producers
//! call [`SqliteTargetRegistry::put`] when a target appears and
//! [`SqliteTargetRegistry::remove`] when it is deleted; a missing row simply
//! resolves to [`TargetResolution::Unresolved`].

use rusqlite::OptionalExtension as _;

use tidings_core::target::{
  TargetRef, TargetRegistry, TargetResolution, TargetSummary,
};

use crate::{
  Result,
  encode::{encode_target_kind, encode_uuid},
};

#[derive(Clone)]
pub struct SqliteTargetRegistry {
  conn: tokio_rusqlite::Connection,
}

impl SqliteTargetRegistry {
  pub(crate) fn new(conn: tokio_rusqlite::Connection) -> Self {
    Self { conn }
  }

  /// Record (or refresh) the registry's view of a target.
  pub async fn put(&self, target: TargetRef, summary: TargetSummary) -> Result<()> {
    let target_kind_str = encode_target_kind(target.kind).to_owned();
    let target_id_str   = encode_uuid(target.id);
    let title           = summary.title;
    let author_name     = summary.author_name;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO targets (target_kind, target_id, title, author_name)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (target_kind, target_id)
           DO UPDATE SET title = ?3, author_name = ?4",
          rusqlite::params![target_kind_str, target_id_str, title, author_name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Forget a target. Its notifications are untouched; they will list with
  /// a placeholder summary from now on.
  pub async fn remove(&self, target: TargetRef) -> Result<()> {
    let target_kind_str = encode_target_kind(target.kind).to_owned();
    let target_id_str   = encode_uuid(target.id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM targets WHERE target_kind = ?1 AND target_id = ?2",
          rusqlite::params![target_kind_str, target_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl TargetRegistry for SqliteTargetRegistry {
  type Error = crate::Error;

  async fn resolve(&self, target: TargetRef) -> Result<TargetResolution> {
    let target_kind_str = encode_target_kind(target.kind).to_owned();
    let target_id_str   = encode_uuid(target.id);

    let row: Option<(String, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT title, author_name FROM targets
               WHERE target_kind = ?1 AND target_id = ?2",
              rusqlite::params![target_kind_str, target_id_str],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(match row {
      Some((title, author_name)) => {
        TargetResolution::Resolved(TargetSummary { title, author_name })
      }
      None => TargetResolution::Unresolved,
    })
  }
}
