use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    /// Required field missing or malformed. Surfaced to the caller for
    /// correction, never partially applied.
    Validation(String),
    /// An operation named an id that does not exist: (entity, id).
    /// Aborts with no side effect.
    Reference(&'static str, i64),
    NotFound,
    Session(String),
    PermissionDenied(String),
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            AppError::Reference(entity, id) => write!(f, "Unknown {entity} id {id}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Session(msg) => write!(f, "Session error: {msg}"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            AppError::Reference(entity, id) => HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("{entity} {id} does not exist")
            })),
            AppError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "not found" }))
            }
            AppError::Session(_) => HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "authentication required" })),
            AppError::PermissionDenied(_) => {
                HttpResponse::Forbidden().json(serde_json::json!({ "error": "permission denied" }))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "internal server error" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}
