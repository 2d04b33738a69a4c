/// Configuration management for Blog Service
///
/// Configuration is read from environment variables; a `.env` file is loaded
/// by `main` before this runs.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CorsConfig {
    /// Configured origins, trimmed, empty entries dropped.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BLOG_SERVICE_PORT", 8080)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.split(',').any(|o| o.trim() == "*") {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://blog.db".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 5)?,
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "BLOG_SERVICE_HOST",
        "BLOG_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_for_development() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert!(!config.app.is_production());
        assert_eq!(config.app.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.database.url, "sqlite://blog.db");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    #[serial]
    fn overrides_from_env() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_HOST", "127.0.0.1");
        std::env::set_var("BLOG_SERVICE_PORT", "9090");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "3");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(
            config.cors.origins().collect::<Vec<_>>(),
            vec!["https://a.test", "https://b.test"]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_port_is_rejected() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_PORT", "eighty");

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("BLOG_SERVICE_PORT"));

        clear_env();
    }

    #[test]
    #[serial]
    fn production_requires_cors_origins() {
        clear_env();
        std::env::set_var("APP_ENV", "production");

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("must be set"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("cannot be '*'"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://blog.example.com");
        let config = Config::from_env().unwrap();
        assert!(config.app.is_production());

        clear_env();
    }
}
