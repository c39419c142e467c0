use rusqlite::{Connection, params};

use super::types::*;
use crate::auth::roles::Role;

const USER_SELECT: &str = "\
SELECT id, username, role, display_name, email, created_at, updated_at FROM users";

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        role: row.get("role")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_user_row)?;
    rows.collect()
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], map_user_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// For login. Returns the internal struct with the password hash.
pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<AuthUser>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password, role, display_name FROM users WHERE username = ?1",
    )?;
    let mut rows = stmt.query_map(params![username], |row| {
        Ok(AuthUser {
            id: row.get("id")?,
            username: row.get("username")?,
            password: row.get("password")?,
            role: row.get("role")?,
            display_name: row.get("display_name")?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn create(
    conn: &Connection,
    payload: &UserPayload,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, password, role, display_name, email) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            payload.username.trim(),
            password_hash,
            payload.role.as_str(),
            payload.display_name.trim(),
            payload.email.trim()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update profile fields and role; the password only when a new hash is
/// supplied. Returns the number of rows changed.
pub fn update(
    conn: &Connection,
    id: i64,
    payload: &UserPayload,
    password_hash: Option<&str>,
) -> rusqlite::Result<usize> {
    let changed = conn.execute(
        "UPDATE users SET username = ?1, role = ?2, display_name = ?3, email = ?4, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?5",
        params![
            payload.username.trim(),
            payload.role.as_str(),
            payload.display_name.trim(),
            payload.email.trim(),
            id
        ],
    )?;
    if let Some(hash) = password_hash {
        conn.execute(
            "UPDATE users SET password = ?1 WHERE id = ?2",
            params![hash, id],
        )?;
    }
    Ok(changed)
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])
}

/// Role of a stored user, for permission checks against the target.
pub fn role_of(conn: &Connection, id: i64) -> rusqlite::Result<Option<Role>> {
    let mut stmt = conn.prepare("SELECT role FROM users WHERE id = ?1")?;
    let mut rows = stmt.query_map(params![id], |row| row.get::<_, Role>(0))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}
