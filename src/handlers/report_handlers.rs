use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::follow_up;
use crate::stats;

/// GET /api/v1/reports/trend?n= — attendance rate per meeting, oldest
/// first (default: last 6 meetings).
pub async fn trend(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let n = query
        .get("n")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(6)
        .clamp(1, 52);
    let conn = pool.get()?;
    let points = stats::weekly_trend(&conn, n)?;
    Ok(HttpResponse::Ok().json(points))
}

/// GET /api/v1/reports/groups?meeting_id= — per-group breakdown for one
/// meeting.
pub async fn groups(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = query
        .get("meeting_id")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::Validation("meeting_id is required".to_string()))?;
    let conn = pool.get()?;
    let breakdown = stats::group_breakdown(&conn, meeting_id)?;
    Ok(HttpResponse::Ok().json(breakdown))
}

/// GET /api/v1/reports/servants — agenda-segment counts per free-text
/// servant label, plus follow-up credit per servant record.
pub async fn servants(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let segments = stats::servant_activity(&conn)?;
    let follow_up_credit = follow_up::activity_count_by_servant(&conn)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "segments": segments,
        "follow_ups": follow_up_credit,
    })))
}

/// GET /api/v1/reports/follow-ups — per-method totals and the overall
/// success rate (non-empty outcome counts as success).
pub async fn follow_ups(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let breakdown = stats::follow_up_breakdown(&conn)?;
    let all = follow_up::find_all(&conn)?;
    let success_rate = stats::follow_up_success_rate(&all, |f| !f.outcome.trim().is_empty());
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "methods": breakdown,
        "success_rate": success_rate,
    })))
}

/// GET /api/v1/reports/monthly?start=&end=
pub async fn monthly(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let start = query
        .get("start")
        .cloned()
        .ok_or_else(|| AppError::Validation("start is required".to_string()))?;
    let end = query
        .get("end")
        .cloned()
        .ok_or_else(|| AppError::Validation("end is required".to_string()))?;
    let conn = pool.get()?;
    let months = stats::attendance_by_month(&conn, &start, &end)?;
    Ok(HttpResponse::Ok().json(months))
}
