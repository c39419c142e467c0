pub mod attendance_handlers;
pub mod auth_handlers;
pub mod dashboard;
pub mod family_handlers;
pub mod follow_up_handlers;
pub mod group_handlers;
pub mod meeting_handlers;
pub mod notification_handlers;
pub mod report_handlers;
pub mod servant_handlers;
pub mod settings_handlers;
pub mod user_handlers;

use actix_web::web;

use crate::auth::middleware::require_json_content_type;

/// Configure the /api/v1 routes. The caller wraps the scope with the
/// session gate; the JSON Content-Type guard is applied here.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/me", web::get().to(auth_handlers::me))
            .route("/dashboard", web::get().to(dashboard::index))
            // Families
            .route("/families", web::get().to(family_handlers::list))
            .route("/families", web::post().to(family_handlers::create))
            .route("/families/{id}", web::get().to(family_handlers::read))
            .route("/families/{id}", web::put().to(family_handlers::update))
            .route("/families/{id}", web::delete().to(family_handlers::delete))
            .route(
                "/families/{id}/follow-ups",
                web::get().to(follow_up_handlers::list_by_family),
            )
            // Cohort groups
            .route("/groups", web::get().to(group_handlers::list))
            .route("/groups", web::post().to(group_handlers::create))
            .route("/groups/recompute", web::post().to(group_handlers::recompute))
            .route("/groups/{id}", web::get().to(group_handlers::read))
            .route("/groups/{id}", web::put().to(group_handlers::update))
            .route("/groups/{id}", web::delete().to(group_handlers::delete))
            // Meetings and the attendance ledger
            .route("/meetings", web::get().to(meeting_handlers::list))
            .route("/meetings", web::post().to(meeting_handlers::create))
            .route("/meetings/{id}", web::get().to(meeting_handlers::read))
            .route("/meetings/{id}", web::put().to(meeting_handlers::update))
            .route("/meetings/{id}", web::delete().to(meeting_handlers::delete))
            .route(
                "/meetings/{id}/attendance",
                web::get().to(attendance_handlers::list),
            )
            .route(
                "/meetings/{id}/attendance",
                web::post().to(attendance_handlers::mark),
            )
            .route(
                "/meetings/{id}/totals",
                web::get().to(attendance_handlers::totals),
            )
            // Follow-ups
            .route("/follow-ups", web::get().to(follow_up_handlers::list))
            .route("/follow-ups", web::post().to(follow_up_handlers::create))
            // Servants
            .route("/servants", web::get().to(servant_handlers::list))
            .route("/servants", web::post().to(servant_handlers::create))
            .route("/servants/{id}", web::get().to(servant_handlers::read))
            .route("/servants/{id}", web::put().to(servant_handlers::update))
            .route("/servants/{id}", web::delete().to(servant_handlers::delete))
            // Reports
            .route("/reports/trend", web::get().to(report_handlers::trend))
            .route("/reports/groups", web::get().to(report_handlers::groups))
            .route("/reports/servants", web::get().to(report_handlers::servants))
            .route(
                "/reports/follow-ups",
                web::get().to(report_handlers::follow_ups),
            )
            .route("/reports/monthly", web::get().to(report_handlers::monthly))
            // Notifications (link building only)
            .route(
                "/notifications/reminders",
                web::get().to(notification_handlers::reminders),
            )
            .route(
                "/notifications/absentees",
                web::get().to(notification_handlers::absentees),
            )
            // Operator accounts
            .route("/users", web::get().to(user_handlers::list))
            .route("/users", web::post().to(user_handlers::create))
            .route("/users/{id}", web::put().to(user_handlers::update))
            .route("/users/{id}", web::delete().to(user_handlers::delete))
            // Settings
            .route(
                "/settings/delete-policy",
                web::get().to(settings_handlers::get_delete_policy),
            )
            .route(
                "/settings/delete-policy",
                web::put().to(settings_handlers::set_delete_policy),
            ),
    );
}
