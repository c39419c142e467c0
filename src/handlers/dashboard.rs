use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::stats;

/// GET /api/v1/dashboard — the landing-page figures.
pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let dashboard = stats::dashboard(&conn)?;
    Ok(HttpResponse::Ok().json(dashboard))
}
