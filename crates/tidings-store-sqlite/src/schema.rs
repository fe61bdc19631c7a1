//! SQL schema for the Tidings SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per (recipient, target, kind). Repeat events fold into the row:
-- the actor list grows, updated_at moves forward, unread resets to 1.
CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    recipient_id    TEXT NOT NULL,
    target_kind     TEXT NOT NULL,               -- 'post' | 'person'
    target_id       TEXT NOT NULL,
    kind            TEXT NOT NULL,               -- snake_case kind name
    actors          TEXT NOT NULL DEFAULT '[]',  -- JSON array, arrival order
    unread          INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL,               -- ISO 8601 UTC; server-assigned
    updated_at      TEXT NOT NULL,
    UNIQUE (recipient_id, target_kind, target_id, kind)
);

-- The registry's view of target objects owned by other subsystems.
-- Deleting a row makes the target unresolvable; its notifications stay.
CREATE TABLE IF NOT EXISTS targets (
    target_kind TEXT NOT NULL,
    target_id   TEXT NOT NULL,
    title       TEXT NOT NULL,
    author_name TEXT,
    PRIMARY KEY (target_kind, target_id)
);

CREATE INDEX IF NOT EXISTS notifications_recipient_updated_idx
    ON notifications(recipient_id, updated_at);
CREATE INDEX IF NOT EXISTS notifications_recipient_kind_idx
    ON notifications(recipient_id, kind);
CREATE INDEX IF NOT EXISTS notifications_recipient_unread_idx
    ON notifications(recipient_id, unread);

PRAGMA user_version = 1;
";
