//! SQL schema for the contact message store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Contact messages are strictly append-only.
-- The triggers below reject any UPDATE or DELETE against this table.
CREATE TABLE IF NOT EXISTS contacts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL CHECK (length(trim(name)) > 0),
    email         TEXT NOT NULL CHECK (email LIKE '%_@_%._%'),
    topic         TEXT,
    message       TEXT NOT NULL CHECK (length(trim(message)) > 0),
    extensions    TEXT NOT NULL DEFAULT '{}',   -- JSON object of string fields
    submitted_at  TEXT NOT NULL                 -- RFC 3339 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS contacts_submitted_idx ON contacts(submitted_at);

CREATE TRIGGER IF NOT EXISTS contacts_no_update
BEFORE UPDATE ON contacts
BEGIN
    SELECT RAISE(ABORT, 'contact messages are immutable');
END;

CREATE TRIGGER IF NOT EXISTS contacts_no_delete
BEFORE DELETE ON contacts
BEGIN
    SELECT RAISE(ABORT, 'contact messages are never deleted');
END;

PRAGMA user_version = 1;
";
