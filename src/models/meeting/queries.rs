use rusqlite::{Connection, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::attendance;
use crate::models::setting::DeletePolicy;

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM meetings WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
}

/// Base SELECT for meeting list queries, with inline agenda aggregates.
const MEETING_LIST_SELECT: &str = "\
SELECT m.id, m.title, m.date, m.total_attendance, m.total_families, \
       (SELECT COUNT(*) FROM meeting_segments s WHERE s.meeting_id = m.id) AS segment_count, \
       (SELECT COALESCE(SUM(s.duration_minutes), 0) FROM meeting_segments s \
        WHERE s.meeting_id = m.id) AS duration_minutes \
FROM meetings m";

fn map_meeting_list_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MeetingListItem> {
    Ok(MeetingListItem {
        id: row.get("id")?,
        title: row.get("title")?,
        date: row.get("date")?,
        total_attendance: row.get("total_attendance")?,
        total_families: row.get("total_families")?,
        segment_count: row.get("segment_count")?,
        duration_minutes: row.get("duration_minutes")?,
    })
}

/// All meetings newest first, optionally filtered by a case-insensitive
/// substring on the title.
pub fn find_all(conn: &Connection, filter: Option<&str>) -> rusqlite::Result<Vec<MeetingListItem>> {
    match filter {
        Some(q) if !q.trim().is_empty() => {
            let sql = format!(
                "{MEETING_LIST_SELECT} \
                 WHERE LOWER(m.title) LIKE '%' || LOWER(?1) || '%' \
                 ORDER BY m.date DESC, m.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![q.trim()], map_meeting_list_row)?;
            rows.collect()
        }
        _ => {
            let sql = format!("{MEETING_LIST_SELECT} ORDER BY m.date DESC, m.id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_meeting_list_row)?;
            rows.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Meeting>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, date, total_attendance, total_families, created_by, created_at \
         FROM meetings WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], |row| {
        Ok(Meeting {
            id: row.get("id")?,
            title: row.get("title")?,
            date: row.get("date")?,
            total_attendance: row.get("total_attendance")?,
            total_families: row.get("total_families")?,
            agenda: Vec::new(),
            created_by: row.get("created_by")?,
            created_at: row.get("created_at")?,
        })
    })?;

    let mut meeting = match rows.next() {
        Some(row) => row?,
        None => return Ok(None),
    };
    meeting.agenda = find_segments(conn, id)?;
    Ok(Some(meeting))
}

pub fn find_segments(conn: &Connection, meeting_id: i64) -> rusqlite::Result<Vec<Segment>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, duration_minutes, responsible_servant, \
                segment_type, position \
         FROM meeting_segments WHERE meeting_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![meeting_id], |row| {
        Ok(Segment {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            duration_minutes: row.get("duration_minutes")?,
            responsible_servant: row.get("responsible_servant")?,
            segment_type: row.get("segment_type")?,
            position: row.get("position")?,
        })
    })?;
    rows.collect()
}

fn insert_segments(conn: &Connection, meeting_id: i64, agenda: &[Segment]) -> rusqlite::Result<()> {
    for (position, segment) in agenda.iter().enumerate() {
        conn.execute(
            "INSERT INTO meeting_segments \
             (meeting_id, id, title, description, duration_minutes, responsible_servant, \
              segment_type, position) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                meeting_id,
                segment.id,
                segment.title.trim(),
                segment.description,
                segment.duration_minutes,
                segment.responsible_servant.trim(),
                segment.segment_type,
                position as i64
            ],
        )?;
    }
    Ok(())
}

/// Insert a meeting and its agenda, then seed the derived totals (zero
/// present, live family count).
pub fn create(
    conn: &Connection,
    payload: &MeetingPayload,
    created_by: &str,
) -> Result<i64, AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO meetings (title, date, created_by) VALUES (?1, ?2, ?3)",
        params![payload.title.trim(), payload.date.trim(), created_by],
    )?;
    let meeting_id = tx.last_insert_rowid();
    insert_segments(&tx, meeting_id, &payload.agenda)?;
    attendance::refresh_totals(&tx, meeting_id)?;
    tx.commit()?;
    Ok(meeting_id)
}

/// Rewrite title/date and replace the agenda. The derived totals are left
/// to the ledger.
pub fn update(conn: &Connection, id: i64, payload: &MeetingPayload) -> Result<(), AppError> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE meetings SET title = ?1, date = ?2 WHERE id = ?3",
        params![payload.title.trim(), payload.date.trim(), id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }
    tx.execute(
        "DELETE FROM meeting_segments WHERE meeting_id = ?1",
        params![id],
    )?;
    insert_segments(&tx, id, &payload.agenda)?;
    tx.commit()?;
    Ok(())
}

/// Delete a meeting under the configured dependent policy (see
/// family::delete for the twin rule).
pub fn delete(conn: &Connection, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
    if !exists(conn, id)? {
        return Err(AppError::NotFound);
    }

    let dependents: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE meeting_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if policy == DeletePolicy::Block && dependents > 0 {
        return Err(AppError::Validation(format!(
            "meeting has {dependents} attendance record(s); \
             delete them first or switch the delete policy"
        )));
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attendance WHERE meeting_id = ?1", params![id])?;
    tx.execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(())
}
