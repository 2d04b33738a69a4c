/// Blog Service Library
///
/// A small blog backend: posts with comments, exposed over a REST API and
/// persisted in SQLite.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Entities and request bodies for posts and comments
/// - `services`: `PostStore` / `CommentStore` and their SQL-backed implementations
/// - `db`: Migrations, pool initialisation and repository queries
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
/// - `openapi`: OpenAPI document
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
