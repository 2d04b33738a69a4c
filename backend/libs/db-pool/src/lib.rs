//! Database connection pool management
//!
//! Provides unified SQLite pool creation and configuration for the blog services

pub mod env_utils;
mod metrics;

use env_utils::{parse_env_required, parse_env_with_default};
use metrics::update_pool_metrics;
pub use metrics::acquire_with_metrics;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for metrics labeling
    pub service_name: String,
    /// SQLite connection URL (`sqlite://blog.db`, `sqlite::memory:`)
    pub database_url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Verification query timeout after the pool is opened
    pub connect_timeout_secs: u64,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection idle timeout
    pub idle_timeout_secs: u64,
    /// Connection maximum lifetime
    pub max_lifetime_secs: u64,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl DbConfig {
    /// Create a new DbConfig from environment variables
    ///
    /// Requires `DATABASE_URL`; `DB_MAX_CONNECTIONS` sizes the pool.
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let database_url = parse_env_required::<String>("DATABASE_URL")?;
        let mut config = Self::for_service(service_name, &database_url);
        config.max_connections =
            parse_env_with_default("DB_MAX_CONNECTIONS", config.max_connections);
        Ok(config)
    }

    /// Config for a service that resolves its own URL and pool size
    ///
    /// Only the timeout and minimum-size knobs (`DB_MIN_CONNECTIONS`,
    /// `DB_*_TIMEOUT_SECS`, `DB_MAX_LIFETIME_SECS`) are read from the
    /// environment; `max_connections` keeps its default for the caller to set.
    pub fn for_service(service_name: &str, database_url: &str) -> Self {
        let defaults = Self::default();

        Self {
            service_name: service_name.to_string(),
            database_url: database_url.to_string(),
            max_connections: defaults.max_connections,
            min_connections: parse_env_with_default("DB_MIN_CONNECTIONS", defaults.min_connections),
            connect_timeout_secs: parse_env_with_default(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default(
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            ),
            max_lifetime_secs: parse_env_with_default(
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime_secs,
            ),
        }
    }

    /// True when the URL points at a private in-memory database.
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database, so
    /// such pools are pinned to a single connection that is never recycled.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            "Database Pool Configuration: \
             max_connections={}, min_connections={}, \
             connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.max_connections,
            self.min_connections,
            self.connect_timeout_secs,
            self.acquire_timeout_secs,
            self.idle_timeout_secs,
            self.max_lifetime_secs
        );
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            // Timeout for acquiring a connection from the pool
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .test_before_acquire(true);

        if self.is_in_memory() {
            if self.max_connections != 1 {
                warn!(
                    service = %self.service_name,
                    requested = self.max_connections,
                    "In-memory database pinned to a single connection"
                );
            }
            return options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            // Close connections idle for longer than this
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            // Maximum lifetime of a connection
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
    }
}

/// Create a SQLite connection pool with automatic metrics monitoring
///
/// The database file is created when missing and foreign key enforcement is
/// switched on for every connection.
pub async fn create_pool(config: DbConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!(
        "Creating database pool: service={}, max={}, min={}, \
         acquire_timeout={}s, verify_timeout={}s, idle_timeout={}s",
        config.service_name,
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
        config.connect_timeout_secs,
        config.idle_timeout_secs
    );

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = config
        .pool_options()
        .connect_with(connect_options)
        .await?;

    // Verify connection with connect timeout
    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );

            update_pool_metrics(&pool, &config.service_name);

            {
                let pool_clone = pool.clone();
                let service = config.service_name.clone();
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(Duration::from_secs(30));
                    loop {
                        interval.tick().await;
                        if pool_clone.is_closed() {
                            break;
                        }
                        update_pool_metrics(&pool_clone, &service);
                    }
                });
            }

            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_pool_env() {
        for key in [
            "DB_MAX_CONNECTIONS",
            "DB_MIN_CONNECTIONS",
            "DB_CONNECT_TIMEOUT_SECS",
            "DB_ACQUIRE_TIMEOUT_SECS",
            "DB_IDLE_TIMEOUT_SECS",
            "DB_MAX_LIFETIME_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.acquire_timeout_secs, 10);
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_without_override() {
        clear_pool_env();
        std::env::set_var("DATABASE_URL", "sqlite://test.db");

        let config = DbConfig::from_env("test-service").unwrap();

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.database_url, "sqlite://test.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.idle_timeout_secs, 600);

        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_override() {
        clear_pool_env();
        std::env::set_var("DATABASE_URL", "sqlite://test.db");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "not-a-number");

        let config = DbConfig::from_env("test-service").unwrap();
        assert_eq!(config.max_connections, 12);
        // Unparseable values fall back to the default
        assert_eq!(config.acquire_timeout_secs, 10);

        clear_pool_env();
        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_requires_url() {
        std::env::remove_var("DATABASE_URL");
        let err = DbConfig::from_env("test-service").unwrap_err();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    #[serial_test::serial]
    fn test_for_service_ignores_url_and_size_env() {
        clear_pool_env();
        std::env::set_var("DATABASE_URL", "sqlite://elsewhere.db");
        std::env::set_var("DB_MAX_CONNECTIONS", "40");
        std::env::set_var("DB_IDLE_TIMEOUT_SECS", "30");

        let config = DbConfig::for_service("blog-service", "sqlite://blog.db");
        assert_eq!(config.service_name, "blog-service");
        assert_eq!(config.database_url, "sqlite://blog.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.idle_timeout_secs, 30);

        clear_pool_env();
        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = DbConfig {
            database_url: "sqlite:///var/lib/secret.db".to_string(),
            ..DbConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret.db"));
    }

    #[test]
    fn test_in_memory_detection() {
        let memory = DbConfig {
            database_url: "sqlite::memory:".to_string(),
            ..DbConfig::default()
        };
        assert!(memory.is_in_memory());

        let shared = DbConfig {
            database_url: "sqlite:file:blog?mode=memory&cache=shared".to_string(),
            ..DbConfig::default()
        };
        assert!(shared.is_in_memory());

        let file = DbConfig {
            database_url: "sqlite://blog.db".to_string(),
            ..DbConfig::default()
        };
        assert!(!file.is_in_memory());
    }
}
