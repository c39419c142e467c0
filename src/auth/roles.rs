use serde::{Deserialize, Serialize};

/// Operator role. Stored as TEXT on the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl rusqlite::types::FromSql for Role {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        Role::parse(s).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("unknown role '{s}'").into())
        })
    }
}

/// Whether a role may open the user-management surface at all.
pub fn can_manage_users(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin)
}

/// Whether `acting` may edit or delete a user holding `target`.
/// Super admins manage everyone; admins manage plain users only.
pub fn can_edit_user(acting: Role, target: Role) -> bool {
    match acting {
        Role::SuperAdmin => true,
        Role::Admin => target == Role::User,
        Role::User => false,
    }
}

/// Roles `acting` is allowed to hand out.
pub fn assignable_roles(acting: Role) -> &'static [Role] {
    match acting {
        Role::SuperAdmin => &[Role::SuperAdmin, Role::Admin, Role::User],
        Role::Admin => &[Role::Admin, Role::User],
        Role::User => &[],
    }
}
