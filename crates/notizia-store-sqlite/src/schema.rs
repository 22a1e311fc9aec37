//! SQL schema for the Notizia SQLite store.
//!
//! Executed once when the store is opened. `PRAGMA user_version` records the
//! schema version; future migrations will be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting, so it lives here rather than
/// in the database file.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS clients (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL CHECK (length(name) >= 2),
    note  TEXT                 -- length limit is advisory, UI-side only
);

CREATE TABLE IF NOT EXISTS cases (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id          INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    problem_category   TEXT    NOT NULL,
    problem_text       TEXT    NOT NULL,
    started_at         TEXT    NOT NULL,   -- RFC 3339 UTC, millisecond precision
    status             TEXT    NOT NULL DEFAULT 'open'
                               CHECK (status IN ('open', 'resolved', 'dropped')),
    resolved_at        TEXT,
    resolved_by_method TEXT,
    sessions_total     INTEGER,
    pc_self            INTEGER,
    pc_relationships   INTEGER,
    pc_world           INTEGER,
    symptom_change_pct INTEGER,
    outcome_notes      TEXT
);

CREATE TABLE IF NOT EXISTS sessions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    case_id           INTEGER NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
    started_at        TEXT    NOT NULL,
    duration_min      INTEGER,
    method            TEXT    NOT NULL,
    ease_hypnosis     INTEGER,
    sud_before        INTEGER,
    sud_after         INTEGER,
    emotional_release TEXT,
    insights          TEXT,
    notes             TEXT
);

CREATE INDEX IF NOT EXISTS cases_client_idx  ON cases(client_id);
CREATE INDEX IF NOT EXISTS sessions_case_idx ON sessions(case_id);

PRAGMA user_version = 1;
";
