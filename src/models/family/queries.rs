use rusqlite::{Connection, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::attendance;
use crate::models::setting::DeletePolicy;

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM families WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM families", [], |row| row.get(0))
}

/// All families in insertion order, optionally filtered by a
/// case-insensitive substring on the husband or wife name.
pub fn find_all(conn: &Connection, filter: Option<&str>) -> rusqlite::Result<Vec<FamilyListItem>> {
    const SELECT: &str = "\
        SELECT f.id, f.husband_name, f.wife_name, f.church, f.marriage_date, f.group_id, \
               (SELECT COUNT(*) FROM children c WHERE c.family_id = f.id) AS children_count \
        FROM families f";

    let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<FamilyListItem> {
        Ok(FamilyListItem {
            id: row.get("id")?,
            husband_name: row.get("husband_name")?,
            wife_name: row.get("wife_name")?,
            church: row.get("church")?,
            marriage_date: row.get("marriage_date")?,
            group_id: row.get("group_id")?,
            children_count: row.get("children_count")?,
        })
    };

    match filter {
        Some(q) if !q.trim().is_empty() => {
            let sql = format!(
                "{SELECT} \
                 WHERE LOWER(f.husband_name) LIKE '%' || LOWER(?1) || '%' \
                    OR LOWER(f.wife_name) LIKE '%' || LOWER(?1) || '%' \
                 ORDER BY f.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![q.trim()], map)?;
            rows.collect()
        }
        _ => {
            let sql = format!("{SELECT} ORDER BY f.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map)?;
            rows.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Family>> {
    let mut stmt = conn.prepare(
        "SELECT id, husband_name, wife_name, husband_phone, wife_phone, home_phone, \
                church, husband_spiritual_father, wife_spiritual_father, address, \
                husband_occupation, wife_occupation, marriage_date, group_id, \
                created_at, updated_at \
         FROM families WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], |row| {
        Ok(Family {
            id: row.get("id")?,
            husband_name: row.get("husband_name")?,
            wife_name: row.get("wife_name")?,
            husband_phone: row.get("husband_phone")?,
            wife_phone: row.get("wife_phone")?,
            home_phone: row.get("home_phone")?,
            church: row.get("church")?,
            husband_spiritual_father: row.get("husband_spiritual_father")?,
            wife_spiritual_father: row.get("wife_spiritual_father")?,
            address: row.get("address")?,
            husband_occupation: row.get("husband_occupation")?,
            wife_occupation: row.get("wife_occupation")?,
            marriage_date: row.get("marriage_date")?,
            group_id: row.get("group_id")?,
            children: Vec::new(),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    })?;

    let mut family = match rows.next() {
        Some(row) => row?,
        None => return Ok(None),
    };
    family.children = find_children(conn, id)?;
    Ok(Some(family))
}

fn find_children(conn: &Connection, family_id: i64) -> rusqlite::Result<Vec<Child>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, birth_date, school_grade, notes \
         FROM children WHERE family_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![family_id], |row| {
        Ok(Child {
            id: row.get("id")?,
            name: row.get("name")?,
            birth_date: row.get("birth_date")?,
            school_grade: row.get("school_grade")?,
            notes: row.get("notes")?,
        })
    })?;
    rows.collect()
}

pub fn find_contacts(conn: &Connection) -> rusqlite::Result<Vec<FamilyContact>> {
    let mut stmt = conn.prepare(
        "SELECT id, husband_name, wife_name, husband_phone, wife_phone \
         FROM families ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(FamilyContact {
            id: row.get("id")?,
            husband_name: row.get("husband_name")?,
            wife_name: row.get("wife_name")?,
            husband_phone: row.get("husband_phone")?,
            wife_phone: row.get("wife_phone")?,
        })
    })?;
    rows.collect()
}

fn insert_children(conn: &Connection, family_id: i64, children: &[Child]) -> rusqlite::Result<()> {
    // Rows with a blank name are dropped, matching the entry form.
    for (position, child) in children
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .enumerate()
    {
        conn.execute(
            "INSERT INTO children (family_id, id, name, birth_date, school_grade, notes, position) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                family_id,
                child.id,
                child.name.trim(),
                child.birth_date,
                child.school_grade,
                child.notes,
                position as i64
            ],
        )?;
    }
    Ok(())
}

/// Insert a family and its children. `group_id` is the resolver's output;
/// callers resolve before persisting.
pub fn create(
    conn: &Connection,
    payload: &FamilyPayload,
    group_id: Option<i64>,
) -> Result<i64, AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO families (husband_name, wife_name, husband_phone, wife_phone, home_phone, \
                               church, husband_spiritual_father, wife_spiritual_father, address, \
                               husband_occupation, wife_occupation, marriage_date, group_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            payload.husband_name.trim(),
            payload.wife_name.trim(),
            payload.husband_phone.trim(),
            payload.wife_phone.trim(),
            payload.home_phone.trim(),
            payload.church.trim(),
            payload.husband_spiritual_father.trim(),
            payload.wife_spiritual_father.trim(),
            payload.address.trim(),
            payload.husband_occupation.trim(),
            payload.wife_occupation.trim(),
            payload.marriage_date.trim(),
            group_id
        ],
    )?;
    let family_id = tx.last_insert_rowid();
    insert_children(&tx, family_id, &payload.children)?;
    tx.commit()?;
    Ok(family_id)
}

/// Rewrite a family and replace its children list.
pub fn update(
    conn: &Connection,
    id: i64,
    payload: &FamilyPayload,
    group_id: Option<i64>,
) -> Result<(), AppError> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE families \
         SET husband_name = ?1, wife_name = ?2, husband_phone = ?3, wife_phone = ?4, \
             home_phone = ?5, church = ?6, husband_spiritual_father = ?7, \
             wife_spiritual_father = ?8, address = ?9, husband_occupation = ?10, \
             wife_occupation = ?11, marriage_date = ?12, group_id = ?13, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?14",
        params![
            payload.husband_name.trim(),
            payload.wife_name.trim(),
            payload.husband_phone.trim(),
            payload.wife_phone.trim(),
            payload.home_phone.trim(),
            payload.church.trim(),
            payload.husband_spiritual_father.trim(),
            payload.wife_spiritual_father.trim(),
            payload.address.trim(),
            payload.husband_occupation.trim(),
            payload.wife_occupation.trim(),
            payload.marriage_date.trim(),
            group_id,
            id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound);
    }
    tx.execute("DELETE FROM children WHERE family_id = ?1", params![id])?;
    insert_children(&tx, id, &payload.children)?;
    tx.commit()?;
    Ok(())
}

/// Write the derived group assignment. Used by the resolver pass only.
pub fn set_group(conn: &Connection, id: i64, group_id: Option<i64>) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE families SET group_id = ?1 WHERE id = ?2",
        params![group_id, id],
    )
}

/// (attendance rows, follow-up rows) referencing this family.
pub fn dependent_counts(conn: &Connection, id: i64) -> rusqlite::Result<(i64, i64)> {
    let attendance: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE family_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    let follow_ups: i64 = conn.query_row(
        "SELECT COUNT(*) FROM follow_ups WHERE family_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok((attendance, follow_ups))
}

/// Delete a family under the configured dependent policy.
///
/// Block refuses while attendance or follow-up rows reference the family.
/// Cascade removes the dependents in the same transaction and refreshes the
/// totals of every meeting the family was marked in.
pub fn delete(conn: &Connection, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
    if !exists(conn, id)? {
        return Err(AppError::NotFound);
    }

    let (attendance_count, follow_up_count) = dependent_counts(conn, id)?;
    if policy == DeletePolicy::Block && (attendance_count > 0 || follow_up_count > 0) {
        return Err(AppError::Validation(format!(
            "family has {attendance_count} attendance record(s) and \
             {follow_up_count} follow-up(s); delete them first or switch the delete policy"
        )));
    }

    let tx = conn.unchecked_transaction()?;

    // Meetings whose totals change once this family's marks are gone.
    let mut stmt = tx.prepare(
        "SELECT DISTINCT meeting_id FROM attendance WHERE family_id = ?1",
    )?;
    let touched: Vec<i64> = stmt
        .query_map(params![id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    drop(stmt);

    tx.execute(
        "DELETE FROM follow_ups WHERE family_id = ?1",
        params![id],
    )?;
    tx.execute("DELETE FROM attendance WHERE family_id = ?1", params![id])?;
    tx.execute("DELETE FROM families WHERE id = ?1", params![id])?;

    for meeting_id in touched {
        attendance::refresh_totals(&tx, meeting_id)?;
    }
    tx.commit()?;
    Ok(())
}
