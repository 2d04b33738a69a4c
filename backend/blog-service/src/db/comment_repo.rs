use crate::models::Comment;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

/// List every comment, newest first
pub async fn list_comments(conn: &mut SqliteConnection) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, name, email, content, created_at
        FROM comments
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(comments)
}

/// Get all comments for a post, newest first
pub async fn list_comments_by_post(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, name, email, content, created_at
        FROM comments
        WHERE post_id = ?1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(conn)
    .await?;

    Ok(comments)
}

/// Get a single comment by ID
pub async fn find_comment_by_id(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, name, email, content, created_at
        FROM comments
        WHERE id = ?1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(conn)
    .await?;

    Ok(comment)
}

/// Create a new comment on a post
///
/// The caller is responsible for checking the post exists; an orphan insert
/// fails on the foreign key.
pub async fn insert_comment(
    conn: &mut SqliteConnection,
    post_id: i64,
    name: &str,
    email: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, name, email, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, post_id, name, email, content, created_at
        "#,
    )
    .bind(post_id)
    .bind(name)
    .bind(email)
    .bind(content)
    .bind(created_at)
    .fetch_one(conn)
    .await?;

    Ok(comment)
}

/// Overwrite name, email and content; post and creation time stay as stored
pub async fn update_comment(
    conn: &mut SqliteConnection,
    comment_id: i64,
    name: &str,
    email: &str,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET name = ?1, email = ?2, content = ?3
        WHERE id = ?4
        RETURNING id, post_id, name, email, content, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(content)
    .bind(comment_id)
    .fetch_optional(conn)
    .await?;

    Ok(comment)
}

/// Replace only the provided fields; `None` leaves the stored column untouched
pub async fn patch_comment(
    conn: &mut SqliteConnection,
    comment_id: i64,
    name: Option<&str>,
    email: Option<&str>,
    content: Option<&str>,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            content = COALESCE(?3, content)
        WHERE id = ?4
        RETURNING id, post_id, name, email, content, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(content)
    .bind(comment_id)
    .fetch_optional(conn)
    .await?;

    Ok(comment)
}

pub async fn delete_comment(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?1")
        .bind(comment_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn comment_exists(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> Result<bool, sqlx::Error> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM comments WHERE id = ?1)")
            .bind(comment_id)
            .fetch_one(conn)
            .await?;

    Ok(exists)
}
