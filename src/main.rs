use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use eftekad::{auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    std::fs::create_dir_all("data").expect("Failed to create data directory");
    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/eftekad.db".to_string());

    let pool = db::init_pool(&database_path);
    db::run_migrations(&pool);

    // Seed default operator accounts if the database is empty.
    let default_hash = auth::password::hash_password("admin123")
        .expect("Failed to hash default password");
    db::seed(&pool, &default_hash);

    // Session encryption key — from SESSION_KEY for sessions that survive
    // restarts, otherwise generated per run.
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            // Public routes
            .route("/login", web::post().to(handlers::auth_handlers::login))
            .route("/logout", web::post().to(handlers::auth_handlers::logout))
            // Session-gated API
            .service(
                web::scope("/api/v1")
                    .wrap(actix_web::middleware::from_fn(
                        auth::middleware::require_auth,
                    ))
                    .configure(handlers::configure),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
