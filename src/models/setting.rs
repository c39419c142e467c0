use rusqlite::{Connection, params};

/// Get a setting's value by name, returning a default if not set.
pub fn get_value(conn: &Connection, name: &str, default: &str) -> String {
    conn.query_row(
        "SELECT value FROM settings WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .unwrap_or_else(|_| default.to_string())
}

pub fn set_value(conn: &Connection, name: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings (name, value) VALUES (?1, ?2) \
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![name, value],
    )?;
    Ok(())
}

pub fn clear(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM settings WHERE name = ?1", params![name])?;
    Ok(())
}

/// What happens to attendance and follow-up rows when a family or meeting
/// that owns them is deleted. Stored under `delete_policy` so the operator
/// can switch it without a redeploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    Block,
    Cascade,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Block => "block",
            DeletePolicy::Cascade => "cascade",
        }
    }

    pub fn parse(s: &str) -> Option<DeletePolicy> {
        match s {
            "block" => Some(DeletePolicy::Block),
            "cascade" => Some(DeletePolicy::Cascade),
            _ => None,
        }
    }

    /// Load the configured policy, defaulting to Block.
    pub fn load(conn: &Connection) -> DeletePolicy {
        DeletePolicy::parse(&get_value(conn, "delete_policy", "block"))
            .unwrap_or(DeletePolicy::Block)
    }
}
