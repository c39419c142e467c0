use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance::{self, MarkPayload};

/// POST /api/v1/meetings/{id}/attendance — upsert one family's mark for
/// the meeting. The meeting totals are refreshed as part of the call.
pub async fn mark(
    pool: web::Data<DbPool>,
    session_handle: Session,
    path: web::Path<i64>,
    body: web::Json<MarkPayload>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    let meeting_id = path.into_inner();
    let conn = pool.get()?;

    let record = attendance::mark(
        &conn,
        body.family_id,
        meeting_id,
        body.status,
        body.reason.as_deref(),
        &current.name,
    )?;
    Ok(HttpResponse::Ok().json(record))
}

/// GET /api/v1/meetings/{id}/attendance — the meeting's ledger rows.
pub async fn list(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;

    // Repair any drifted totals before the caller reads alongside them.
    attendance::verify_totals(&conn, meeting_id)?;
    let records = attendance::find_by_meeting(&conn, meeting_id)?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/v1/meetings/{id}/totals — computed from the ledger and the
/// live family count, never from the cached columns.
pub async fn totals(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let totals = attendance::totals_for(&conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(totals))
}
