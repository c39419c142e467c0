use actix_session::Session;
use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::assignment;
use crate::auth::{session, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::family::{self, FamilyPayload};
use crate::models::group;
use crate::models::setting::DeletePolicy;

fn validate_payload(payload: &FamilyPayload) -> Result<(), AppError> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&payload.husband_name, "Husband name", 100));
    errors.extend(validate::validate_required(&payload.wife_name, "Wife name", 100));
    errors.extend(validate::validate_required(&payload.church, "Church", 200));
    errors.extend(validate::validate_date(&payload.marriage_date, "Marriage date"));
    errors.extend(validate::validate_optional(&payload.address, "Address", 500));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

/// GET /api/v1/families?q= — list, with a case-insensitive name filter.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let families = family::find_all(&conn, query.get("q").map(|s| s.as_str()))?;
    Ok(HttpResponse::Ok().json(families))
}

pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = family::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// POST /api/v1/families — create, resolving the cohort group from the
/// marriage date before persisting.
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<FamilyPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let conn = pool.get()?;

    let groups = group::find_ranges(&conn)?;
    let group_id = assignment::resolve(&body.marriage_date, &groups).group_id();
    let family_id = family::create(&conn, &body, group_id)?;

    let created = family::find_by_id(&conn, family_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/v1/families/{id} — rewrite; the group assignment is
/// re-resolved since the marriage date may have changed.
pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<FamilyPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    let groups = group::find_ranges(&conn)?;
    let group_id = assignment::resolve(&body.marriage_date, &groups).group_id();
    family::update(&conn, id, &body, group_id)?;

    let updated = family::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/families/{id} — governed by the configured delete policy.
pub async fn delete(
    pool: web::Data<DbPool>,
    session_handle: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let current = session::require_login(&session_handle)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    let policy = DeletePolicy::load(&conn);
    family::delete(&conn, id, policy)?;
    log::info!("family {id} deleted by '{}' (policy {})", current.name, policy.as_str());
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
