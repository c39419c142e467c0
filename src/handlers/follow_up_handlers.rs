use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::follow_up::{self, NewFollowUp};

/// GET /api/v1/follow-ups — most recent follow-up date first.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let follow_ups = follow_up::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(follow_ups))
}

/// GET /api/v1/families/{id}/follow-ups
pub async fn list_by_family(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let follow_ups = follow_up::find_by_family(&conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(follow_ups))
}

/// POST /api/v1/follow-ups — append a contact attempt. Validation happens
/// in the tracker; nothing is written on failure.
pub async fn create(
    pool: web::Data<DbPool>,
    session_handle: Session,
    body: web::Json<NewFollowUp>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    let conn = pool.get()?;

    let created = follow_up::record(&conn, &body, &current.name)?;
    Ok(HttpResponse::Created().json(created))
}
