//! SQL schema for the odontogram SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per tooth in normal operation. tooth_number is deliberately not
-- UNIQUE: the upsert reuses an existing row, and reads tolerate duplicates by
-- preferring the most recently updated one.
CREATE TABLE IF NOT EXISTS tooth_notes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    tooth_number  INTEGER NOT NULL,
    note          TEXT,            -- NULL or '' means no note
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond precision
    updated_at    TEXT NOT NULL    -- refreshed on every write
);

CREATE INDEX IF NOT EXISTS tooth_notes_tooth_idx ON tooth_notes(tooth_number);

PRAGMA user_version = 1;
";
