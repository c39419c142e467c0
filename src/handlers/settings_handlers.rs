use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::roles::can_manage_users;
use crate::auth::session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::setting::{self, DeletePolicy};

/// GET /api/v1/settings/delete-policy
pub async fn get_delete_policy(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let policy = DeletePolicy::load(&conn);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "delete_policy": policy.as_str() })))
}

#[derive(Debug, Deserialize)]
pub struct DeletePolicyForm {
    pub delete_policy: String,
}

/// PUT /api/v1/settings/delete-policy — managers only.
pub async fn set_delete_policy(
    pool: web::Data<DbPool>,
    session_handle: Session,
    body: web::Json<DeletePolicyForm>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    if !can_manage_users(current.role) {
        return Err(AppError::PermissionDenied("settings.edit".to_string()));
    }

    let policy = DeletePolicy::parse(&body.delete_policy).ok_or_else(|| {
        AppError::Validation("delete_policy must be 'block' or 'cascade'".to_string())
    })?;

    let conn = pool.get()?;
    setting::set_value(&conn, "delete_policy", policy.as_str())?;
    log::info!("delete policy set to '{}' by '{}'", policy.as_str(), current.name);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "delete_policy": policy.as_str() })))
}
