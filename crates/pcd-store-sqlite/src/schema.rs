//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id    TEXT PRIMARY KEY,
    full_name    TEXT NOT NULL,
    national_id  TEXT NOT NULL UNIQUE,
    phone        TEXT,
    note         TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    event_id     TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    event_date   TEXT,             -- YYYY-MM-DD or NULL
    description  TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS person_events (
    person_id    TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    event_id     TEXT NOT NULL REFERENCES events(event_id)  ON DELETE CASCADE,
    PRIMARY KEY (person_id, event_id)
);

-- One current document per (person, category); re-uploads replace the row.
CREATE TABLE IF NOT EXISTS documents (
    document_id  TEXT PRIMARY KEY,
    person_id    TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    category     TEXT NOT NULL,
    filename     TEXT NOT NULL,
    location     TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    size_bytes   INTEGER NOT NULL,
    created_at   TEXT NOT NULL,
    UNIQUE (person_id, category)
);

-- Append-only history. No foreign keys: entries outlive what they describe.
CREATE TABLE IF NOT EXISTS activity (
    entry_id     TEXT PRIMARY KEY,
    recorded_at  TEXT NOT NULL,
    kind         TEXT NOT NULL,
    person_id    TEXT,
    event_id     TEXT,
    category     TEXT,
    detail       TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS person_events_event_idx ON person_events(event_id);
CREATE INDEX IF NOT EXISTS activity_recorded_idx   ON activity(recorded_at);
CREATE INDEX IF NOT EXISTS activity_person_idx     ON activity(person_id);

PRAGMA user_version = 1;
";
