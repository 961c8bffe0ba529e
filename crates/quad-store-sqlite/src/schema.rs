//! SQL schema for the Quad SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `student_id` columns deliberately carry no foreign key: appointments,
/// reviews and GPA records outlive a deleted account and stay renderable
/// through their denormalised display fields.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Only students are stored; doctor/admin are synthesised at login.
CREATE TABLE IF NOT EXISTS accounts (
    account_id      TEXT PRIMARY KEY,
    full_name       TEXT NOT NULL,
    matric          TEXT NOT NULL UNIQUE,
    email           TEXT NOT NULL,
    credential_hash TEXT NOT NULL,   -- argon2id PHC string
    phone           TEXT,
    avatar_url      TEXT,
    department      TEXT,
    faculty         TEXT,
    created_at      TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id TEXT PRIMARY KEY,
    student_id     TEXT NOT NULL,
    student_name   TEXT NOT NULL,
    student_matric TEXT NOT NULL,
    reason         TEXT NOT NULL,    -- VisitReason display label
    date           TEXT NOT NULL,    -- opaque; no calendar validation
    time           TEXT NOT NULL,
    note           TEXT NOT NULL DEFAULT '',
    status         TEXT NOT NULL DEFAULT 'pending',
    created_at     TEXT NOT NULL
);

-- Reviews are immutable; the only mutation is an admin DELETE.
CREATE TABLE IF NOT EXISTS reviews (
    review_id    TEXT PRIMARY KEY,
    student_id   TEXT NOT NULL,
    student_name TEXT NOT NULL,
    target_kind  TEXT NOT NULL,      -- 'lecturer' | 'vendor'
    target_id    TEXT NOT NULL,
    target_name  TEXT NOT NULL,
    rating       INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment      TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);

-- Strictly append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS gpa_records (
    record_id    TEXT PRIMARY KEY,
    student_id   TEXT NOT NULL,
    semester     TEXT NOT NULL,
    courses_json TEXT NOT NULL,      -- JSON array of Course rows
    gpa          REAL NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS lecturers (
    lecturer_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    department  TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vendors (
    vendor_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    location   TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Rolling log; pruned to the newest 100 rows on every insert.
CREATE TABLE IF NOT EXISTS audit_log (
    entry_id    TEXT PRIMARY KEY,
    severity    TEXT NOT NULL,       -- 'info' | 'success' | 'warning' | 'error'
    action      TEXT NOT NULL,
    actor       TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS appointments_student_idx ON appointments(student_id);
CREATE INDEX IF NOT EXISTS appointments_status_idx  ON appointments(status);
CREATE INDEX IF NOT EXISTS reviews_target_idx       ON reviews(target_kind);
CREATE INDEX IF NOT EXISTS gpa_student_idx          ON gpa_records(student_id);

PRAGMA user_version = 1;
";
