use actix_session::Session;

use crate::auth::roles::Role;
use crate::errors::AppError;

/// The authenticated operator for the current request, read from the
/// session cookie and threaded into role-gated operations.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

pub fn current_user(session: &Session) -> Option<CurrentUser> {
    let id = session.get::<i64>("user_id").unwrap_or(None)?;
    let name = session.get::<String>("name").unwrap_or(None)?;
    let role = session
        .get::<String>("role")
        .unwrap_or(None)
        .and_then(|r| Role::parse(&r))?;
    Some(CurrentUser { id, name, role })
}

pub fn require_login(session: &Session) -> Result<CurrentUser, AppError> {
    current_user(session).ok_or_else(|| AppError::Session("not signed in".to_string()))
}

pub fn sign_in(session: &Session, id: i64, name: &str, role: Role) -> Result<(), AppError> {
    session
        .insert("user_id", id)
        .and_then(|_| session.insert("name", name))
        .and_then(|_| session.insert("role", role.as_str()))
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn sign_out(session: &Session) {
    session.purge();
}
