use rusqlite::{Connection, params};

use super::types::*;
use crate::errors::AppError;

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM servants WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
}

/// Returns the first id in the set with no servant row, if any.
pub fn find_missing(conn: &Connection, ids: &[i64]) -> rusqlite::Result<Option<i64>> {
    for &id in ids {
        if !exists(conn, id)? {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

fn load_scope(conn: &Connection, servant_id: i64, scope_tag: &str) -> rusqlite::Result<GroupScope> {
    if scope_tag == "all" {
        return Ok(GroupScope::Unrestricted);
    }
    let mut stmt = conn.prepare(
        "SELECT group_id FROM servant_groups WHERE servant_id = ?1 ORDER BY group_id",
    )?;
    let ids = stmt
        .query_map(params![servant_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(GroupScope::Specific(ids))
}

fn load_with_scope(conn: &Connection, row: &rusqlite::Row<'_>) -> rusqlite::Result<Servant> {
    let id: i64 = row.get("id")?;
    let scope_tag: String = row.get("scope")?;
    Ok(Servant {
        id,
        name: row.get("name")?,
        role: row.get("role")?,
        contact: row.get("contact")?,
        notes: row.get("notes")?,
        scope: load_scope(conn, id, &scope_tag)?,
    })
}

/// All servants in insertion order, optionally filtered by a
/// case-insensitive substring on the name.
pub fn find_all(conn: &Connection, filter: Option<&str>) -> rusqlite::Result<Vec<Servant>> {
    const SELECT: &str = "SELECT id, name, role, contact, notes, scope FROM servants";
    let mut out = Vec::new();
    match filter {
        Some(q) if !q.trim().is_empty() => {
            let sql = format!("{SELECT} WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%' ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![q.trim()])?;
            while let Some(row) = rows.next()? {
                out.push(load_with_scope(conn, row)?);
            }
        }
        _ => {
            let sql = format!("{SELECT} ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                out.push(load_with_scope(conn, row)?);
            }
        }
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Servant>> {
    let mut stmt =
        conn.prepare("SELECT id, name, role, contact, notes, scope FROM servants WHERE id = ?1")?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(load_with_scope(conn, row)?)),
        None => Ok(None),
    }
}

/// Servants whose scope covers the given group (unrestricted or listed).
pub fn find_for_group(conn: &Connection, group_id: i64) -> rusqlite::Result<Vec<Servant>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, role, contact, notes, scope FROM servants s \
         WHERE s.scope = 'all' \
            OR EXISTS(SELECT 1 FROM servant_groups sg \
                      WHERE sg.servant_id = s.id AND sg.group_id = ?1) \
         ORDER BY s.id",
    )?;
    let mut rows = stmt.query(params![group_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(load_with_scope(conn, row)?);
    }
    Ok(out)
}

fn write_scope(conn: &Connection, servant_id: i64, scope: &GroupScope) -> Result<(), AppError> {
    conn.execute(
        "DELETE FROM servant_groups WHERE servant_id = ?1",
        params![servant_id],
    )?;
    if let GroupScope::Specific(group_ids) = scope {
        for &group_id in group_ids {
            let known: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM family_groups WHERE id = ?1)",
                params![group_id],
                |row| row.get(0),
            )?;
            if !known {
                return Err(AppError::Reference("group", group_id));
            }
            conn.execute(
                "INSERT OR IGNORE INTO servant_groups (servant_id, group_id) VALUES (?1, ?2)",
                params![servant_id, group_id],
            )?;
        }
    }
    Ok(())
}

fn scope_tag(scope: &GroupScope) -> &'static str {
    match scope {
        GroupScope::Unrestricted => "all",
        GroupScope::Specific(_) => "groups",
    }
}

pub fn create(conn: &Connection, payload: &ServantPayload) -> Result<i64, AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO servants (name, role, contact, notes, scope) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            payload.name.trim(),
            payload.role.as_str(),
            payload.contact.trim(),
            payload.notes.trim(),
            scope_tag(&payload.scope)
        ],
    )?;
    let servant_id = tx.last_insert_rowid();
    write_scope(&tx, servant_id, &payload.scope)?;
    tx.commit()?;
    Ok(servant_id)
}

pub fn update(conn: &Connection, id: i64, payload: &ServantPayload) -> Result<(), AppError> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE servants SET name = ?1, role = ?2, contact = ?3, notes = ?4, scope = ?5 \
         WHERE id = ?6",
        params![
            payload.name.trim(),
            payload.role.as_str(),
            payload.contact.trim(),
            payload.notes.trim(),
            scope_tag(&payload.scope),
            id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }
    write_scope(&tx, id, &payload.scope)?;
    tx.commit()?;
    Ok(())
}

/// A servant credited on follow-ups cannot be removed; the ledger of past
/// contact attempts must keep its references intact.
pub fn delete(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !exists(conn, id)? {
        return Err(AppError::NotFound);
    }
    let referenced: i64 = conn.query_row(
        "SELECT COUNT(*) FROM follow_up_servants WHERE servant_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if referenced > 0 {
        return Err(AppError::Validation(format!(
            "servant is credited on {referenced} follow-up(s) and cannot be deleted"
        )));
    }
    conn.execute("DELETE FROM servants WHERE id = ?1", params![id])?;
    Ok(())
}
