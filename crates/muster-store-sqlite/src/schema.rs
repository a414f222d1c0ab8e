//! SQL schema for the muster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS events (
    event_id         TEXT PRIMARY KEY,   -- creation-ordered opaque token
    title            TEXT NOT NULL,
    start_time       TEXT NOT NULL,
    end_time         TEXT,
    location         TEXT NOT NULL,
    signup_deadline  TEXT NOT NULL,
    highlights       TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    prizes           TEXT NOT NULL DEFAULT '[]',   -- opaque JSON
    registered_count INTEGER NOT NULL DEFAULT 0,
    max_participants INTEGER,
    banner_url       TEXT,
    description      TEXT,
    replay_url       TEXT,
    agenda           TEXT,               -- opaque JSON
    target_audience  TEXT,               -- opaque JSON
    requirements     TEXT,               -- opaque JSON
    speakers         TEXT,               -- opaque JSON
    organizer        TEXT,               -- opaque JSON
    tags             TEXT,               -- opaque JSON
    difficulty       TEXT,
    benefits         TEXT,               -- opaque JSON
    survey_questions TEXT NOT NULL DEFAULT '[]'    -- JSON array of questions
);

-- The unique triple is the actual race guard for concurrent registration;
-- the count column is maintained in the same transaction as the insert.
CREATE TABLE IF NOT EXISTS registrations (
    registration_id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id        TEXT NOT NULL REFERENCES events(event_id),
    name            TEXT NOT NULL,
    department      TEXT NOT NULL,
    registered_at   TEXT NOT NULL,       -- ISO 8601 UTC; server-assigned
    UNIQUE (event_id, name, department)
);

-- One logical response per (event, user); re-submission replaces the row.
CREATE TABLE IF NOT EXISTS survey_responses (
    response_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id     TEXT NOT NULL REFERENCES events(event_id),
    user_id      TEXT NOT NULL,
    answers      TEXT NOT NULL,          -- JSON array of option indices
    submitted_at TEXT NOT NULL,
    UNIQUE (event_id, user_id)
);

CREATE INDEX IF NOT EXISTS registrations_event_idx    ON registrations(event_id);
CREATE INDEX IF NOT EXISTS survey_responses_event_idx ON survey_responses(event_id);

PRAGMA user_version = 1;
";
