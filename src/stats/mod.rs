//! Read-side statistics. Every figure here is derived on demand from the
//! families, meetings, attendance, and follow-up stores; nothing is cached.

use rusqlite::{Connection, params};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::follow_up::FollowUp;
use crate::models::{family, follow_up, meeting};

/// Whole-percent attendance rate, rounded half-up. Zero when there is
/// nothing to divide by — never NaN.
pub fn attendance_rate(present: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((present as f64 / total as f64) * 100.0).round() as i64
}

/// Share of follow-ups the caller's predicate classifies as successful,
/// as a whole percent. Zero for an empty slice.
pub fn follow_up_success_rate<F>(follow_ups: &[FollowUp], is_success: F) -> i64
where
    F: Fn(&FollowUp) -> bool,
{
    let successes = follow_ups.iter().filter(|f| is_success(f)).count() as i64;
    attendance_rate(successes, follow_ups.len() as i64)
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub meeting_id: i64,
    pub title: String,
    pub date: String,
    pub present: i64,
    pub total: i64,
    pub rate: i64,
}

/// Attendance rate of the n most recent meetings, oldest first.
///
/// The store is queried newest-first; the points are reversed before
/// returning so charts render left-to-right chronologically.
pub fn weekly_trend(conn: &Connection, n: i64) -> rusqlite::Result<Vec<TrendPoint>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, date, total_attendance, total_families \
         FROM meetings ORDER BY date DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![n.max(0)], |row| {
        let present: i64 = row.get("total_attendance")?;
        let total: i64 = row.get("total_families")?;
        Ok(TrendPoint {
            meeting_id: row.get("id")?,
            title: row.get("title")?,
            date: row.get("date")?,
            present,
            total,
            rate: attendance_rate(present, total),
        })
    })?;
    let mut points = rows.collect::<Result<Vec<_>, _>>()?;
    points.reverse();
    Ok(points)
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupBreakdown {
    pub group_id: i64,
    pub name: String,
    pub families: i64,
    pub present: i64,
    pub absent: i64,
}

/// Per-group membership and present/absent counts for one meeting.
pub fn group_breakdown(
    conn: &Connection,
    meeting_id: i64,
) -> Result<Vec<GroupBreakdown>, AppError> {
    if !meeting::exists(conn, meeting_id)? {
        return Err(AppError::Reference("meeting", meeting_id));
    }
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, \
                COUNT(f.id) AS families, \
                COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS present, \
                COALESCE(SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END), 0) AS absent \
         FROM family_groups g \
         LEFT JOIN families f ON f.group_id = g.id \
         LEFT JOIN attendance a ON a.family_id = f.id AND a.meeting_id = ?1 \
         GROUP BY g.id, g.name \
         ORDER BY g.id",
    )?;
    let rows = stmt.query_map(params![meeting_id], |row| {
        Ok(GroupBreakdown {
            group_id: row.get("id")?,
            name: row.get("name")?,
            families: row.get("families")?,
            present: row.get("present")?,
            absent: row.get("absent")?,
        })
    })?;
    let breakdown = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(breakdown)
}

/// Agenda credit keyed by the literal responsible-servant text. The agenda
/// stores a free-text label rather than a servant id, so counting groups by
/// name.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentActivity {
    pub servant: String,
    pub count: i64,
}

pub fn servant_activity(conn: &Connection) -> rusqlite::Result<Vec<SegmentActivity>> {
    let mut stmt = conn.prepare(
        "SELECT responsible_servant, COUNT(*) AS count \
         FROM meeting_segments \
         WHERE TRIM(responsible_servant) != '' \
         GROUP BY responsible_servant \
         ORDER BY count DESC, responsible_servant",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(SegmentActivity {
            servant: row.get(0)?,
            count: row.get(1)?,
        })
    })?;
    rows.collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodBreakdown {
    pub method: String,
    pub count: i64,
    pub successful: i64,
}

/// Follow-up volume and success per method. A non-empty outcome counts as
/// success; deferred attempts with no outcome count zero.
pub fn follow_up_breakdown(conn: &Connection) -> rusqlite::Result<Vec<MethodBreakdown>> {
    let mut stmt = conn.prepare(
        "SELECT method, COUNT(*) AS count, \
                SUM(CASE WHEN TRIM(outcome) != '' THEN 1 ELSE 0 END) AS successful \
         FROM follow_ups GROUP BY method ORDER BY method",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MethodBreakdown {
            method: row.get("method")?,
            count: row.get("count")?,
            successful: row.get("successful")?,
        })
    })?;
    rows.collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAttendance {
    pub month: String,
    pub present: i64,
    pub absent: i64,
}

/// Present/absent totals per calendar month over a date range (inclusive).
pub fn attendance_by_month(
    conn: &Connection,
    start: &str,
    end: &str,
) -> rusqlite::Result<Vec<MonthlyAttendance>> {
    let mut stmt = conn.prepare(
        "SELECT strftime('%Y-%m', m.date) AS month, \
                SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END) AS present, \
                SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END) AS absent \
         FROM meetings m \
         JOIN attendance a ON a.meeting_id = m.id \
         WHERE m.date >= ?1 AND m.date <= ?2 \
         GROUP BY month ORDER BY month",
    )?;
    let rows = stmt.query_map(params![start, end], |row| {
        Ok(MonthlyAttendance {
            month: row.get("month")?,
            present: row.get("present")?,
            absent: row.get("absent")?,
        })
    })?;
    rows.collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_families: i64,
    pub present_families: i64,
    pub absent_families: i64,
    pub attendance_rate: i64,
    pub follow_up_count: i64,
    pub weekly_trend: Vec<TrendPoint>,
}

/// The landing-page figures: latest meeting's turnout against the live
/// family count, plus the 5-meeting trend.
pub fn dashboard(conn: &Connection) -> rusqlite::Result<DashboardStats> {
    let total_families = family::count(conn)?;

    let present_families: i64 = conn
        .query_row(
            "SELECT total_attendance FROM meetings ORDER BY date DESC, id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let absent_families = (total_families - present_families).max(0);

    Ok(DashboardStats {
        total_families,
        present_families,
        absent_families,
        attendance_rate: attendance_rate(present_families, total_families),
        follow_up_count: follow_up::count(conn)?,
        weekly_trend: weekly_trend(conn, 5)?,
    })
}
