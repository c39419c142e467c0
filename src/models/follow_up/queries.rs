use rusqlite::{Connection, params};

use super::types::*;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::{family, servant};

fn servant_ids_for(conn: &Connection, follow_up_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT servant_id FROM follow_up_servants WHERE follow_up_id = ?1 ORDER BY servant_id",
    )?;
    let rows = stmt.query_map(params![follow_up_id], |row| row.get(0))?;
    rows.collect()
}

fn load_follow_up(conn: &Connection, row: &rusqlite::Row<'_>) -> rusqlite::Result<FollowUp> {
    let id: i64 = row.get("id")?;
    Ok(FollowUp {
        id,
        family_id: row.get("family_id")?,
        method: row.get("method")?,
        responsible_servant_ids: servant_ids_for(conn, id)?,
        notes: row.get("notes")?,
        outcome: row.get("outcome")?,
        follow_up_date: row.get("follow_up_date")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
    })
}

const FOLLOW_UP_SELECT: &str = "\
SELECT id, family_id, method, notes, outcome, follow_up_date, created_by, created_at \
FROM follow_ups";

/// Validate and append one contact attempt. The row and its servant join
/// rows are written in one transaction; any validation failure leaves no
/// trace.
pub fn record(
    conn: &Connection,
    new: &NewFollowUp,
    created_by: &str,
) -> Result<FollowUp, AppError> {
    if let Some(msg) = validate::validate_required(&new.notes, "Notes", 2000) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_required(&new.outcome, "Outcome", 500) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_date(&new.follow_up_date, "Follow-up date") {
        return Err(AppError::Validation(msg));
    }
    if new.responsible_servant_ids.is_empty() {
        return Err(AppError::Validation(
            "at least one responsible servant is required".to_string(),
        ));
    }
    if !family::exists(conn, new.family_id)? {
        return Err(AppError::Reference("family", new.family_id));
    }
    if let Some(missing) = servant::find_missing(conn, &new.responsible_servant_ids)? {
        return Err(AppError::Reference("servant", missing));
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO follow_ups (family_id, method, notes, outcome, follow_up_date, created_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.family_id,
            new.method.as_str(),
            new.notes.trim(),
            new.outcome.trim(),
            new.follow_up_date.trim(),
            created_by
        ],
    )?;
    let follow_up_id = tx.last_insert_rowid();
    for &servant_id in &new.responsible_servant_ids {
        tx.execute(
            "INSERT OR IGNORE INTO follow_up_servants (follow_up_id, servant_id) VALUES (?1, ?2)",
            params![follow_up_id, servant_id],
        )?;
    }

    let mut stmt = tx.prepare(&format!("{FOLLOW_UP_SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query(params![follow_up_id])?;
    let created = match rows.next()? {
        Some(row) => load_follow_up(&tx, row)?,
        None => return Err(AppError::NotFound),
    };
    drop(rows);
    drop(stmt);
    tx.commit()?;
    Ok(created)
}

/// All follow-ups, most recent follow-up date first.
pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<FollowUp>> {
    let sql = format!("{FOLLOW_UP_SELECT} ORDER BY follow_up_date DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(load_follow_up(conn, row)?);
    }
    Ok(out)
}

pub fn find_by_family(conn: &Connection, family_id: i64) -> Result<Vec<FollowUp>, AppError> {
    if !family::exists(conn, family_id)? {
        return Err(AppError::Reference("family", family_id));
    }
    let sql = format!(
        "{FOLLOW_UP_SELECT} WHERE family_id = ?1 ORDER BY follow_up_date DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![family_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(load_follow_up(conn, row)?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<FollowUp>> {
    let sql = format!("{FOLLOW_UP_SELECT} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(load_follow_up(conn, row)?)),
        None => Ok(None),
    }
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM follow_ups", [], |row| row.get(0))
}

/// Every servant listed on a follow-up gets one full credit for it.
pub fn activity_count_by_servant(conn: &Connection) -> rusqlite::Result<Vec<ServantActivity>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, COUNT(*) AS count \
         FROM follow_up_servants j \
         JOIN servants s ON s.id = j.servant_id \
         GROUP BY s.id, s.name \
         ORDER BY count DESC, s.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ServantActivity {
            servant_id: row.get("id")?,
            name: row.get("name")?,
            count: row.get("count")?,
        })
    })?;
    rows.collect()
}

/// The surfaced flow is append-only, but the store supports corrections.
pub fn update(conn: &Connection, id: i64, new: &NewFollowUp) -> Result<(), AppError> {
    if find_by_id(conn, id)?.is_none() {
        return Err(AppError::NotFound);
    }
    if new.responsible_servant_ids.is_empty() {
        return Err(AppError::Validation(
            "at least one responsible servant is required".to_string(),
        ));
    }
    if let Some(missing) = servant::find_missing(conn, &new.responsible_servant_ids)? {
        return Err(AppError::Reference("servant", missing));
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE follow_ups SET family_id = ?1, method = ?2, notes = ?3, outcome = ?4, \
                               follow_up_date = ?5 \
         WHERE id = ?6",
        params![
            new.family_id,
            new.method.as_str(),
            new.notes.trim(),
            new.outcome.trim(),
            new.follow_up_date.trim(),
            id
        ],
    )?;
    tx.execute(
        "DELETE FROM follow_up_servants WHERE follow_up_id = ?1",
        params![id],
    )?;
    for &servant_id in &new.responsible_servant_ids {
        tx.execute(
            "INSERT OR IGNORE INTO follow_up_servants (follow_up_id, servant_id) VALUES (?1, ?2)",
            params![id, servant_id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), AppError> {
    let changed = conn.execute("DELETE FROM follow_ups WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
