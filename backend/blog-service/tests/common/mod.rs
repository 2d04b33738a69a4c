//! Shared fixtures for blog-service integration tests.

#![allow(dead_code)]

use blog_service::db::MIGRATOR;
use blog_service::models::{NewComment, NewPost};
use db_pool::{create_pool, DbConfig};
use sqlx::SqlitePool;

/// Fresh in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let config = DbConfig {
        service_name: "blog-service-test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        ..DbConfig::default()
    };
    let pool = create_pool(config).await.expect("in-memory pool");
    MIGRATOR.run(&pool).await.expect("migrations");
    pool
}

pub fn new_post(title: &str, content: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: content.to_string(),
    }
}

pub fn new_comment(name: &str, content: &str) -> NewComment {
    NewComment {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        content: content.to_string(),
    }
}
