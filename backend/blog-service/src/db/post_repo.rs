use crate::models::Post;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

/// List every post, newest first
pub async fn list_posts(conn: &mut SqliteConnection) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, author, created_at, updated_at
        FROM posts
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(posts)
}

/// Find a post by ID
pub async fn find_post_by_id(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, author, created_at, updated_at
        FROM posts
        WHERE id = ?1
        "#,
    )
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(post)
}

/// Insert a new post and return the stored row
pub async fn insert_post(
    conn: &mut SqliteConnection,
    title: &str,
    content: &str,
    author: &str,
    created_at: DateTime<Utc>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, author, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, title, content, author, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author)
    .bind(created_at)
    .fetch_one(conn)
    .await?;

    Ok(post)
}

/// Overwrite title and content; `None` when the post does not exist
pub async fn update_post(
    conn: &mut SqliteConnection,
    post_id: i64,
    title: &str,
    content: &str,
    updated_at: DateTime<Utc>,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = ?1, content = ?2, updated_at = ?3
        WHERE id = ?4
        RETURNING id, title, content, author, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(updated_at)
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(post)
}

/// Replace only the provided fields, always stamping `updated_at`
///
/// `None` leaves the stored column untouched.
pub async fn patch_post(
    conn: &mut SqliteConnection,
    post_id: i64,
    title: Option<&str>,
    content: Option<&str>,
    updated_at: DateTime<Utc>,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE(?1, title),
            content = COALESCE(?2, content),
            updated_at = ?3
        WHERE id = ?4
        RETURNING id, title, content, author, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(updated_at)
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(post)
}

/// Delete a post; its comments go with it through the cascading foreign key
pub async fn delete_post(conn: &mut SqliteConnection, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(post_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn post_exists(conn: &mut SqliteConnection, post_id: i64) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)")
        .bind(post_id)
        .fetch_one(conn)
        .await?;

    Ok(exists)
}
