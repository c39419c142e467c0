use actix_session::Session;
use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::auth::{session, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::meeting::{self, MeetingPayload, SEGMENT_TYPES};
use crate::models::setting::DeletePolicy;

fn validate_payload(payload: &MeetingPayload) -> Result<(), AppError> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&payload.title, "Title", 200));
    errors.extend(validate::validate_date(&payload.date, "Date"));
    for segment in &payload.agenda {
        errors.extend(validate::validate_required(&segment.id, "Segment id", 64));
        errors.extend(validate::validate_required(&segment.title, "Segment title", 200));
        if segment.duration_minutes < 1 {
            errors.push(format!(
                "Segment '{}' duration must be at least one minute",
                segment.title
            ));
        }
        if !SEGMENT_TYPES.contains(&segment.segment_type.as_str()) {
            errors.push(format!("Unknown segment type '{}'", segment.segment_type));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

/// GET /api/v1/meetings?q= — newest first.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let meetings = meeting::find_all(&conn, query.get("q").map(|s| s.as_str()))?;
    Ok(HttpResponse::Ok().json(meetings))
}

pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = meeting::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn create(
    pool: web::Data<DbPool>,
    session_handle: Session,
    body: web::Json<MeetingPayload>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    validate_payload(&body)?;
    let conn = pool.get()?;

    let meeting_id = meeting::create(&conn, &body, &current.name)?;
    let created = meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<MeetingPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    meeting::update(&conn, id, &body)?;
    let updated = meeting::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/meetings/{id} — governed by the configured delete policy.
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    let policy = DeletePolicy::load(&conn);
    meeting::delete(&conn, id, policy)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
