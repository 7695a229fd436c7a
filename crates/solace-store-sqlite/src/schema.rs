//! SQL schema for the Solace SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One settings document per user; the PRIMARY KEY is the uniqueness
-- constraint on the owner. Catalogs are embedded JSON arrays, never
-- independent rows.
CREATE TABLE IF NOT EXISTS settings (
    user_id          TEXT PRIMARY KEY,
    setup_complete   INTEGER NOT NULL DEFAULT 0,
    reflection_alert TEXT,            -- ISO 8601 UTC or NULL
    tags             TEXT NOT NULL DEFAULT '[]',  -- JSON array of items
    activities       TEXT NOT NULL DEFAULT '[]'   -- JSON array of items
);

CREATE TABLE IF NOT EXISTS entries (
    entry_id     TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    mood         TEXT NOT NULL,       -- one of the four mood literals
    emotion      TEXT NOT NULL,
    body         TEXT NOT NULL,
    activities   TEXT NOT NULL DEFAULT '[]',  -- JSON snapshots
    tags         TEXT NOT NULL DEFAULT '[]',  -- JSON snapshots
    linked_entry TEXT,
    created_at   TEXT NOT NULL,       -- ISO 8601 UTC; server-assigned
    updated_at   TEXT
);

CREATE INDEX IF NOT EXISTS entries_user_idx    ON entries(user_id);
CREATE INDEX IF NOT EXISTS entries_created_idx ON entries(created_at);
CREATE INDEX IF NOT EXISTS entries_linked_idx  ON entries(linked_entry);

PRAGMA user_version = 1;
";
