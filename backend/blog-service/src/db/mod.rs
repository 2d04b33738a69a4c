/// Database access layer
///
/// This module provides:
/// - Embedded schema migrations
/// - Pool initialisation through the shared `db-pool` crate
/// - Repository functions for posts and comments (one parameterized query each)
pub mod comment_repo;
pub mod post_repo;

use crate::config::DatabaseConfig;
use db_pool::{acquire_with_metrics, create_pool, DbConfig};
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Label used for this service's pool metrics
pub const SERVICE_NAME: &str = "blog-service";

/// Pool settings for the service.
///
/// URL and pool size come from `DATABASE_URL` / `DATABASE_MAX_CONNECTIONS`
/// (via `Config`); db-pool's `DB_MAX_CONNECTIONS` is not consulted. The
/// remaining `DB_*` timeout knobs still apply.
pub fn pool_config(database: &DatabaseConfig) -> DbConfig {
    DbConfig {
        max_connections: database.max_connections,
        ..DbConfig::for_service(SERVICE_NAME, &database.url)
    }
}

/// Open the pool and bring the schema up to date.
pub async fn init_pool(database: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let cfg = pool_config(database);
    cfg.log_config();
    let pool = create_pool(cfg).await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Check out a connection, recording acquire latency under `SERVICE_NAME`.
pub async fn acquire(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
    acquire_with_metrics(pool, SERVICE_NAME).await
}
