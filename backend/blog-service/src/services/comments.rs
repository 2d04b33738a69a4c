/// Comment store - comment creation, retrieval, and management
use crate::db::{self, comment_repo};
use crate::error::Result;
use crate::metrics::record_store_op;
use crate::models::{patch_value, Comment, CommentPatch, CommentUpdate, NewComment};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// Data access for comments.
///
/// The store does not check that a comment's post exists; callers do that
/// before `create` and `get_by_post_id`.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// All comments, newest first.
    async fn get_all(&self) -> Result<Vec<Comment>>;

    async fn get_by_id(&self, comment_id: i64) -> Result<Option<Comment>>;

    /// Comments of one post, newest first.
    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// Persist a comment under `post_id`, stamped with the current time.
    async fn create(&self, post_id: i64, comment: NewComment) -> Result<Comment>;

    /// Overwrite name, email and content of `comment.id`.
    async fn update(&self, comment: CommentUpdate) -> Result<Option<Comment>>;

    /// Apply the non-blank fields of `patch`.
    async fn patch(&self, comment_id: i64, patch: CommentPatch) -> Result<Option<Comment>>;

    async fn delete(&self, comment_id: i64) -> Result<bool>;

    async fn exists(&self, comment_id: i64) -> Result<bool>;
}

#[derive(Clone)]
pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentService {
    async fn get_all(&self) -> Result<Vec<Comment>> {
        let result: Result<Vec<Comment>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(comment_repo::list_comments(&mut conn).await?)
        }
        .await;

        record_store_op("comment", "get_all", &result);
        result
    }

    async fn get_by_id(&self, comment_id: i64) -> Result<Option<Comment>> {
        let result: Result<Option<Comment>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(comment_repo::find_comment_by_id(&mut conn, comment_id).await?)
        }
        .await;

        record_store_op("comment", "get_by_id", &result);
        result
    }

    async fn get_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>> {
        let result: Result<Vec<Comment>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(comment_repo::list_comments_by_post(&mut conn, post_id).await?)
        }
        .await;

        record_store_op("comment", "get_by_post_id", &result);
        result
    }

    async fn create(&self, post_id: i64, comment: NewComment) -> Result<Comment> {
        let result: Result<Comment> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let created = comment_repo::insert_comment(
                &mut conn,
                post_id,
                &comment.name,
                &comment.email,
                &comment.content,
                Utc::now(),
            )
            .await?;
            Ok(created)
        }
        .await;

        record_store_op("comment", "create", &result);
        if let Ok(created) = &result {
            tracing::info!(comment_id = created.id, post_id, "comment created");
        }
        result
    }

    async fn update(&self, comment: CommentUpdate) -> Result<Option<Comment>> {
        let result: Result<Option<Comment>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let updated = comment_repo::update_comment(
                &mut conn,
                comment.id,
                &comment.name,
                &comment.email,
                &comment.content,
            )
            .await?;
            Ok(updated)
        }
        .await;

        record_store_op("comment", "update", &result);
        if let Ok(Some(_)) = &result {
            tracing::info!(comment_id = comment.id, "comment updated");
        }
        result
    }

    async fn patch(&self, comment_id: i64, patch: CommentPatch) -> Result<Option<Comment>> {
        let result: Result<Option<Comment>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let patched = comment_repo::patch_comment(
                &mut conn,
                comment_id,
                patch_value(patch.name.as_deref()),
                patch_value(patch.email.as_deref()),
                patch_value(patch.content.as_deref()),
            )
            .await?;
            Ok(patched)
        }
        .await;

        record_store_op("comment", "patch", &result);
        if let Ok(Some(_)) = &result {
            tracing::info!(comment_id, "comment patched");
        }
        result
    }

    async fn delete(&self, comment_id: i64) -> Result<bool> {
        let result: Result<bool> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(comment_repo::delete_comment(&mut conn, comment_id).await?)
        }
        .await;

        record_store_op("comment", "delete", &result);
        if matches!(result, Ok(true)) {
            tracing::info!(comment_id, "comment deleted");
        }
        result
    }

    async fn exists(&self, comment_id: i64) -> Result<bool> {
        let result: Result<bool> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(comment_repo::comment_exists(&mut conn, comment_id).await?)
        }
        .await;

        record_store_op("comment", "exists", &result);
        result
    }
}
