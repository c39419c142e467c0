use rusqlite::{Connection, params};

use super::types::*;

/// Base SELECT for group listings, with an inline member count.
const GROUP_SELECT: &str = "\
SELECT g.id, g.name, g.description, g.range_start, g.range_end, \
       (SELECT COUNT(*) FROM families f WHERE f.group_id = g.id) AS family_count, \
       g.created_at, g.updated_at \
FROM family_groups g";

fn map_group_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FamilyGroup> {
    Ok(FamilyGroup {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        range_start: row.get("range_start")?,
        range_end: row.get("range_end")?,
        family_count: row.get("family_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// All groups in insertion order, optionally filtered by a
/// case-insensitive substring on name or description.
pub fn find_all(conn: &Connection, filter: Option<&str>) -> rusqlite::Result<Vec<FamilyGroup>> {
    match filter {
        Some(q) if !q.trim().is_empty() => {
            let sql = format!(
                "{GROUP_SELECT} \
                 WHERE LOWER(g.name) LIKE '%' || LOWER(?1) || '%' \
                    OR LOWER(g.description) LIKE '%' || LOWER(?1) || '%' \
                 ORDER BY g.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![q.trim()], map_group_row)?;
            rows.collect()
        }
        _ => {
            let sql = format!("{GROUP_SELECT} ORDER BY g.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_group_row)?;
            rows.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<FamilyGroup>> {
    let sql = format!("{GROUP_SELECT} WHERE g.id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], map_group_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// The ordered range list the resolver scans. Insertion (id) order — the
/// first containing range wins, so this order is part of the contract.
pub fn find_ranges(conn: &Connection) -> rusqlite::Result<Vec<GroupRange>> {
    let mut stmt =
        conn.prepare("SELECT id, range_start, range_end FROM family_groups ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(GroupRange {
            id: row.get(0)?,
            start: row.get(1)?,
            end: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn create(conn: &Connection, payload: &GroupPayload) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO family_groups (name, description, range_start, range_end) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            payload.name.trim(),
            payload.description.trim(),
            payload.range_start.trim(),
            payload.range_end.trim()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns the number of rows changed (0 when the group is gone).
pub fn update(conn: &Connection, id: i64, payload: &GroupPayload) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE family_groups \
         SET name = ?1, description = ?2, range_start = ?3, range_end = ?4, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?5",
        params![
            payload.name.trim(),
            payload.description.trim(),
            payload.range_start.trim(),
            payload.range_end.trim(),
            id
        ],
    )
}

/// Dependent families get their group_id nulled (FK SET NULL); the caller
/// runs the resolver pass afterwards to reassign them.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM family_groups WHERE id = ?1", params![id])
}
