//! Shared test infrastructure for model-layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied. The insert helpers write minimal rows directly so each
//! test arranges exactly the state it needs.

#![allow(dead_code)]

use rusqlite::{Connection, params};
use tempfile::TempDir;

use eftekad::db::MIGRATIONS;

/// Returns (TempDir, Connection); the TempDir must be kept alive for the
/// Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

pub fn insert_family(
    conn: &Connection,
    husband: &str,
    wife: &str,
    marriage_date: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO families (husband_name, wife_name, church, marriage_date) \
         VALUES (?1, ?2, 'St. Mary', ?3)",
        params![husband, wife, marriage_date],
    )
    .expect("Failed to insert family");
    conn.last_insert_rowid()
}

pub fn insert_group(conn: &Connection, name: &str, start: &str, end: &str) -> i64 {
    conn.execute(
        "INSERT INTO family_groups (name, description, range_start, range_end) \
         VALUES (?1, '', ?2, ?3)",
        params![name, start, end],
    )
    .expect("Failed to insert group");
    conn.last_insert_rowid()
}

pub fn insert_meeting(conn: &Connection, title: &str, date: &str) -> i64 {
    conn.execute(
        "INSERT INTO meetings (title, date) VALUES (?1, ?2)",
        params![title, date],
    )
    .expect("Failed to insert meeting");
    conn.last_insert_rowid()
}

pub fn insert_segment(
    conn: &Connection,
    meeting_id: i64,
    segment_id: &str,
    title: &str,
    responsible_servant: &str,
    segment_type: &str,
) {
    conn.execute(
        "INSERT INTO meeting_segments \
         (meeting_id, id, title, duration_minutes, responsible_servant, segment_type, position) \
         VALUES (?1, ?2, ?3, 15, ?4, ?5, 0)",
        params![meeting_id, segment_id, title, responsible_servant, segment_type],
    )
    .expect("Failed to insert segment");
}

pub fn insert_servant(conn: &Connection, name: &str, role: &str) -> i64 {
    conn.execute(
        "INSERT INTO servants (name, role) VALUES (?1, ?2)",
        params![name, role],
    )
    .expect("Failed to insert servant");
    conn.last_insert_rowid()
}

pub fn family_group_id(conn: &Connection, family_id: i64) -> Option<i64> {
    conn.query_row(
        "SELECT group_id FROM families WHERE id = ?1",
        params![family_id],
        |row| row.get(0),
    )
    .expect("Failed to read family group_id")
}

pub fn stored_totals(conn: &Connection, meeting_id: i64) -> (i64, i64) {
    conn.query_row(
        "SELECT total_attendance, total_families FROM meetings WHERE id = ?1",
        params![meeting_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .expect("Failed to read meeting totals")
}
