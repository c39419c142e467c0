use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

/// Internal user struct for authentication — includes the password hash.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub display_name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Role,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}
