use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{password, session};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /login — verify credentials and open a session.
pub async fn login(
    pool: web::Data<DbPool>,
    session_handle: Session,
    body: web::Json<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    let found = user::find_by_username(&conn, body.username.trim())?;
    let Some(auth_user) = found else {
        return Ok(unauthorized());
    };
    if !password::verify_password(&body.password, &auth_user.password)? {
        return Ok(unauthorized());
    }

    session::sign_in(
        &session_handle,
        auth_user.id,
        &auth_user.display_name,
        auth_user.role,
    )?;
    log::info!("user '{}' signed in", auth_user.username);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "user": {
            "id": auth_user.id,
            "name": auth_user.display_name,
            "role": auth_user.role,
        }
    })))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "ok": false,
        "error": "invalid username or password"
    }))
}

/// POST /logout
pub async fn logout(session_handle: Session) -> HttpResponse {
    session::sign_out(&session_handle);
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

/// GET /api/v1/me — the signed-in operator.
pub async fn me(session_handle: Session) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": current.id,
        "name": current.name,
        "role": current.role,
    })))
}
