use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::auth::validate;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::servant::{self, ServantPayload};

fn validate_payload(payload: &ServantPayload) -> Result<(), AppError> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&payload.name, "Name", 100));
    errors.extend(validate::validate_optional(&payload.contact, "Contact", 100));
    errors.extend(validate::validate_optional(&payload.notes, "Notes", 500));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

/// GET /api/v1/servants?q=&group_id= — insertion order; group_id narrows
/// to servants whose scope covers that group.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    if let Some(group_id) = query.get("group_id").and_then(|v| v.parse::<i64>().ok()) {
        let servants = servant::find_for_group(&conn, group_id)?;
        return Ok(HttpResponse::Ok().json(servants));
    }
    let servants = servant::find_all(&conn, query.get("q").map(|s| s.as_str()))?;
    Ok(HttpResponse::Ok().json(servants))
}

pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let found = servant::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<ServantPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let conn = pool.get()?;

    let servant_id = servant::create(&conn, &body)?;
    let created = servant::find_by_id(&conn, servant_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<ServantPayload>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&body)?;
    let id = path.into_inner();
    let conn = pool.get()?;

    servant::update(&conn, id, &body)?;
    let updated = servant::find_by_id(&conn, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    servant::delete(&conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
