//! SQL schema for the shiptrack SQLite store.
//!
//! Executed once per connection. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Current state, one row per vessel. Rows are keyed by MMSI because the
-- upstream IMO is not stable.
CREATE TABLE IF NOT EXISTS ships (
    ship_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    mmsi             INTEGER NOT NULL UNIQUE,
    imo              INTEGER NOT NULL DEFAULT 0,
    name             TEXT    NOT NULL DEFAULT '',
    comment          TEXT    NOT NULL DEFAULT '',
    heading          INTEGER NOT NULL DEFAULT 0,
    course           REAL    NOT NULL DEFAULT 0,
    speed            REAL    NOT NULL DEFAULT 0,
    length           REAL    NOT NULL DEFAULT 0,
    width            REAL    NOT NULL DEFAULT 0,
    draught          REAL    NOT NULL DEFAULT 0,
    ref_front        INTEGER NOT NULL DEFAULT 0,
    ref_left         INTEGER NOT NULL DEFAULT 0,
    path             TEXT    NOT NULL DEFAULT '',
    class            TEXT    NOT NULL DEFAULT '0',
    kind             TEXT    NOT NULL DEFAULT '0',
    source_call      TEXT    NOT NULL DEFAULT '',
    destination_call TEXT    NOT NULL DEFAULT '',
    vessel_class     INTEGER NOT NULL DEFAULT 0,
    nav_status       INTEGER NOT NULL DEFAULT 0
);

-- Position history grouped by IMO. log_id only ever grows, so the smallest
-- log_id of an IMO is its oldest sample.
CREATE TABLE IF NOT EXISTS gps (
    log_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    imo        INTEGER NOT NULL,
    north      REAL    NOT NULL,   -- latitude, decimal degrees
    east       REAL    NOT NULL,   -- longitude, decimal degrees
    first_seen TEXT    NOT NULL,   -- RFC 3339 UTC
    last_seen  TEXT    NOT NULL    -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS gps_imo_idx ON gps(imo, log_id);

PRAGMA user_version = 1;
";
