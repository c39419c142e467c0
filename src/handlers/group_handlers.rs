use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::assignment;
use crate::auth::validate;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::group::{self, GroupPayload};

fn validate_payload(payload: &GroupPayload) -> Result<(), AppError> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&payload.name, "Name", 100));
    errors.extend(validate::validate_optional(&payload.description, "Description", 500));
    errors.extend(validate::validate_date(&payload.range_start, "Range start"));
    errors.extend(validate::validate_date(&payload.range_end, "Range end"));
    if errors.is_empty() && payload.range_start.trim() > payload.range_end.trim() {
        errors.push("Range start must not be after range end".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

/// GET /api/v1/groups?q= — insertion order; order matters for assignment.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let groups = group::find_all(&conn, query.get("q").map(|s| s.as_str()))?;
    Ok(HttpResponse::Ok().json(groups))
}

pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = group::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// POST /api/v1/groups — create, then recompute every family's assignment
/// since stored group ids are denormalized against the range list.
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<GroupPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let conn = pool.get()?;

    let group_id = group::create(&conn, &body)?;
    let summary = assignment::recompute_all(&conn, false)?;

    let created = group::find_by_id(&conn, group_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "group": created,
        "reassignment": summary,
    })))
}

/// PUT /api/v1/groups/{id} — edit, then recompute assignments.
pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<GroupPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    if group::update(&conn, id, &body)? == 0 {
        return Err(AppError::NotFound);
    }
    let summary = assignment::recompute_all(&conn, false)?;

    let updated = group::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "group": updated,
        "reassignment": summary,
    })))
}

/// DELETE /api/v1/groups/{id} — dependent families are nulled by the store
/// and immediately reassigned by the resolver pass.
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let conn = pool.get()?;

    if group::delete(&conn, id)? == 0 {
        return Err(AppError::NotFound);
    }
    let summary = assignment::recompute_all(&conn, false)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "reassignment": summary,
    })))
}

/// POST /api/v1/groups/recompute — explicit resolver pass. Resumes from
/// the stored checkpoint when an earlier pass was interrupted.
pub async fn recompute(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let summary = assignment::recompute_all(&conn, true)?;
    Ok(HttpResponse::Ok().json(summary))
}
