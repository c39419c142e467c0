use rusqlite::{Connection, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::{family, meeting};

fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        family_id: row.get("family_id")?,
        meeting_id: row.get("meeting_id")?,
        status: row.get("status")?,
        reason: row.get("reason")?,
        recorded_by: row.get("recorded_by")?,
        recorded_at: row.get("recorded_at")?,
    })
}

/// Upsert one (family, meeting) mark. A second call for the same pair
/// replaces the prior record; no duplicates accumulate. The reason is kept
/// only for absences and cleared on a present mark. The owning meeting's
/// totals are refreshed in the same transaction.
pub fn mark(
    conn: &Connection,
    family_id: i64,
    meeting_id: i64,
    status: AttendanceStatus,
    reason: Option<&str>,
    recorded_by: &str,
) -> Result<AttendanceRecord, AppError> {
    if !family::exists(conn, family_id)? {
        return Err(AppError::Reference("family", family_id));
    }
    if !meeting::exists(conn, meeting_id)? {
        return Err(AppError::Reference("meeting", meeting_id));
    }

    let reason = match status {
        AttendanceStatus::Absent => reason.unwrap_or("").trim(),
        AttendanceStatus::Present => "",
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO attendance (family_id, meeting_id, status, reason, recorded_by, recorded_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%dT%H:%M:%S','now')) \
         ON CONFLICT(family_id, meeting_id) DO UPDATE SET \
             status = excluded.status, \
             reason = excluded.reason, \
             recorded_by = excluded.recorded_by, \
             recorded_at = excluded.recorded_at",
        params![family_id, meeting_id, status.as_str(), reason, recorded_by],
    )?;
    refresh_totals(&tx, meeting_id)?;

    let record = find_pair(&tx, family_id, meeting_id)?.ok_or(AppError::NotFound)?;
    tx.commit()?;
    Ok(record)
}

pub fn find_pair(
    conn: &Connection,
    family_id: i64,
    meeting_id: i64,
) -> rusqlite::Result<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, meeting_id, status, reason, recorded_by, recorded_at \
         FROM attendance WHERE family_id = ?1 AND meeting_id = ?2",
    )?;
    let mut rows = stmt.query_map(params![family_id, meeting_id], map_record_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_by_meeting(
    conn: &Connection,
    meeting_id: i64,
) -> rusqlite::Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, meeting_id, status, reason, recorded_by, recorded_at \
         FROM attendance WHERE meeting_id = ?1 ORDER BY family_id",
    )?;
    let rows = stmt.query_map(params![meeting_id], map_record_row)?;
    rows.collect()
}

pub fn find_by_family(
    conn: &Connection,
    family_id: i64,
) -> rusqlite::Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, meeting_id, status, reason, recorded_by, recorded_at \
         FROM attendance WHERE family_id = ?1 ORDER BY meeting_id",
    )?;
    let rows = stmt.query_map(params![family_id], map_record_row)?;
    rows.collect()
}

/// Present count from the ledger plus the live family count. Computed, not
/// read from the cached meeting columns.
pub fn totals_for(conn: &Connection, meeting_id: i64) -> Result<MeetingTotals, AppError> {
    if !meeting::exists(conn, meeting_id)? {
        return Err(AppError::Reference("meeting", meeting_id));
    }
    Ok(compute_totals(conn, meeting_id)?)
}

fn compute_totals(conn: &Connection, meeting_id: i64) -> rusqlite::Result<MeetingTotals> {
    let total_attendance: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE meeting_id = ?1 AND status = 'present'",
        params![meeting_id],
        |row| row.get(0),
    )?;
    let total_families = family::count(conn)?;
    Ok(MeetingTotals {
        total_attendance,
        total_families,
    })
}

/// Rewrite the meeting's denormalized totals from their sources. Always a
/// wholesale recompute, never an increment.
pub fn refresh_totals(conn: &Connection, meeting_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE meetings SET \
             total_attendance = (SELECT COUNT(*) FROM attendance \
                                 WHERE meeting_id = ?1 AND status = 'present'), \
             total_families = (SELECT COUNT(*) FROM families) \
         WHERE id = ?1",
        params![meeting_id],
    )?;
    Ok(())
}

/// Consistency check: when the stored totals disagree with the ledger,
/// repair them in place instead of surfacing an error (the totals are
/// always derivable). Returns true when a repair was needed.
pub fn verify_totals(conn: &Connection, meeting_id: i64) -> Result<bool, AppError> {
    if !meeting::exists(conn, meeting_id)? {
        return Err(AppError::Reference("meeting", meeting_id));
    }

    let (stored_attendance, stored_families): (i64, i64) = conn.query_row(
        "SELECT total_attendance, total_families FROM meetings WHERE id = ?1",
        params![meeting_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let computed = compute_totals(conn, meeting_id)?;

    if stored_attendance == computed.total_attendance
        && stored_families == computed.total_families
    {
        return Ok(false);
    }

    log::warn!(
        "meeting {meeting_id} totals drifted (stored {stored_attendance}/{stored_families}, \
         ledger {}/{}); repairing",
        computed.total_attendance,
        computed.total_families
    );
    refresh_totals(conn, meeting_id)?;
    Ok(true)
}

/// Contacts of families marked absent for a meeting, for the check-in
/// message surface.
pub fn absent_family_contacts(
    conn: &Connection,
    meeting_id: i64,
) -> Result<Vec<family::FamilyContact>, AppError> {
    if !meeting::exists(conn, meeting_id)? {
        return Err(AppError::Reference("meeting", meeting_id));
    }
    let mut stmt = conn.prepare(
        "SELECT f.id, f.husband_name, f.wife_name, f.husband_phone, f.wife_phone \
         FROM families f \
         JOIN attendance a ON a.family_id = f.id \
         WHERE a.meeting_id = ?1 AND a.status = 'absent' \
         ORDER BY f.id",
    )?;
    let rows = stmt.query_map(params![meeting_id], |row| {
        Ok(family::FamilyContact {
            id: row.get("id")?,
            husband_name: row.get("husband_name")?,
            wife_name: row.get("wife_name")?,
            husband_phone: row.get("husband_phone")?,
            wife_phone: row.get("wife_phone")?,
        })
    })?;
    let contacts = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(contacts)
}
