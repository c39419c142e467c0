use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_path: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the default operator accounts and operational settings if the
/// database is empty. Safe to call on every startup.
pub fn seed(pool: &DbPool, default_password_hash: &str) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping seed");
        return;
    }

    let operators = [
        ("superadmin", "super_admin", "المدير العام", "superadmin@church.com"),
        ("admin", "admin", "مدير النظام", "admin@church.com"),
        ("servant", "user", "خادم الكنيسة", "servant@church.com"),
    ];
    for (username, role, display_name, email) in operators {
        let inserted = conn.execute(
            "INSERT INTO users (username, password, role, display_name, email) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, default_password_hash, role, display_name, email],
        );
        if let Err(e) = inserted {
            log::error!("Seed user '{username}' failed: {e}");
        }
    }

    // Dependent deletes are blocked unless the operator switches the policy.
    let _ = conn.execute(
        "INSERT OR IGNORE INTO settings (name, value) VALUES ('delete_policy', 'block')",
        [],
    );

    log::info!("Seed complete: {} operator accounts", operators.len());
}
