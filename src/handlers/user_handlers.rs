use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::roles::{assignable_roles, can_edit_user, can_manage_users};
use crate::auth::{password, session, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, UserPayload};

/// GET /api/v1/users — operator roster, managers only.
pub async fn list(
    pool: web::Data<DbPool>,
    session_handle: Session,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    if !can_manage_users(current.role) {
        return Err(AppError::PermissionDenied("users.list".to_string()));
    }
    let conn = pool.get()?;
    let users = user::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/v1/users — create an operator with a role the acting role is
/// allowed to hand out.
pub async fn create(
    pool: web::Data<DbPool>,
    session_handle: Session,
    body: web::Json<UserPayload>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    if !can_manage_users(current.role) {
        return Err(AppError::PermissionDenied("users.create".to_string()));
    }
    if !assignable_roles(current.role).contains(&body.role) {
        return Err(AppError::PermissionDenied(format!(
            "cannot assign role '{}'",
            body.role.as_str()
        )));
    }

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_username(&body.username));
    errors.extend(validate::validate_password(&body.password));
    errors.extend(validate::validate_required(&body.display_name, "Display name", 100));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let conn = pool.get()?;
    let hash = password::hash_password(&body.password)?;
    let user_id = match user::create(&conn, &body, &hash) {
        Ok(id) => id,
        Err(e) if e.to_string().contains("UNIQUE") => {
            return Err(AppError::Validation("Username already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let created = user::find_by_id(&conn, user_id)?.ok_or(AppError::NotFound)?;
    log::info!("user '{}' created by '{}'", created.username, current.name);
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/v1/users/{id} — gated on both the target's current role and
/// the role being assigned.
pub async fn update(
    pool: web::Data<DbPool>,
    session_handle: Session,
    path: web::Path<i64>,
    body: web::Json<UserPayload>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    let target_role = user::role_of(&conn, id)?.ok_or(AppError::NotFound)?;
    if !can_edit_user(current.role, target_role) {
        return Err(AppError::PermissionDenied("users.edit".to_string()));
    }
    if !assignable_roles(current.role).contains(&body.role) {
        return Err(AppError::PermissionDenied(format!(
            "cannot assign role '{}'",
            body.role.as_str()
        )));
    }

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_username(&body.username));
    errors.extend(validate::validate_required(&body.display_name, "Display name", 100));
    if !body.password.is_empty() {
        errors.extend(validate::validate_password(&body.password));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let hash = if body.password.is_empty() {
        None
    } else {
        Some(password::hash_password(&body.password)?)
    };
    if user::update(&conn, id, &body, hash.as_deref())? == 0 {
        return Err(AppError::NotFound);
    }

    let updated = user::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/users/{id} — no self-deletion.
pub async fn delete(
    pool: web::Data<DbPool>,
    session_handle: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    let id = path.into_inner();
    if id == current.id {
        return Err(AppError::Validation(
            "you cannot delete your own account".to_string(),
        ));
    }
    let conn = pool.get()?;

    let target_role = user::role_of(&conn, id)?.ok_or(AppError::NotFound)?;
    if !can_edit_user(current.role, target_role) {
        return Err(AppError::PermissionDenied("users.delete".to_string()));
    }

    if user::delete(&conn, id)? == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("user {id} deleted by '{}'", current.name);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
