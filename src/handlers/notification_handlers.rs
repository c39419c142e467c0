use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::collections::HashMap;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance;
use crate::models::family::{self, FamilyContact};
use crate::notify;

#[derive(Debug, Serialize)]
struct ContactLinks {
    family_id: i64,
    family_name: String,
    husband_link: Option<String>,
    wife_link: Option<String>,
}

fn links_for(contact: &FamilyContact, message: &str) -> ContactLinks {
    let link = |phone: &str| {
        if phone.trim().is_empty() {
            None
        } else {
            Some(notify::build_contact_link(phone, message))
        }
    };
    ContactLinks {
        family_id: contact.id,
        family_name: format!("{} و {}", contact.husband_name, contact.wife_name),
        husband_link: link(&contact.husband_phone),
        wife_link: link(&contact.wife_phone),
    }
}

/// GET /api/v1/notifications/reminders — every family with a pre-filled
/// reminder link for today's meeting.
pub async fn reminders(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let today = chrono::Local::now().date_naive();
    let message = notify::reminder_message(today);

    let contacts = family::find_contacts(&conn)?;
    let links: Vec<ContactLinks> = contacts.iter().map(|c| links_for(c, &message)).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "families": links,
    })))
}

/// GET /api/v1/notifications/absentees?meeting_id= — families marked
/// absent for the meeting, with a check-in link each.
pub async fn absentees(
    pool: web::Data<DbPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = query
        .get("meeting_id")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::Validation("meeting_id is required".to_string()))?;
    let conn = pool.get()?;

    let message = notify::absentee_message();
    let contacts = attendance::absent_family_contacts(&conn, meeting_id)?;
    let links: Vec<ContactLinks> = contacts.iter().map(|c| links_for(c, message)).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "families": links,
    })))
}
