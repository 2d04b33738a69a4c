/// Post store - post listing, creation, full/partial updates and deletion
use crate::db::{self, comment_repo, post_repo};
use crate::error::Result;
use crate::metrics::record_store_op;
use crate::models::{
    patch_value, Comment, NewPost, Post, PostPatch, PostUpdate, PostWithComments, DEFAULT_AUTHOR,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

/// Data access for posts.
///
/// Absence is reported as `None` / `false`, never as an error.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts with their comments, newest post first.
    async fn get_all(&self) -> Result<Vec<PostWithComments>>;

    async fn get_by_id(&self, post_id: i64) -> Result<Option<PostWithComments>>;

    /// Persist a post authored by `admin`, stamped with the current time.
    async fn create(&self, post: NewPost) -> Result<PostWithComments>;

    /// Overwrite title and content of `post.id` and stamp `updated_date`.
    async fn update(&self, post: PostUpdate) -> Result<Option<PostWithComments>>;

    /// Apply the non-blank fields of `patch`; `updated_date` is stamped even
    /// when nothing else changes.
    async fn patch(&self, post_id: i64, patch: PostPatch) -> Result<Option<PostWithComments>>;

    /// Remove a post together with its comments.
    async fn delete(&self, post_id: i64) -> Result<bool>;

    async fn exists(&self, post_id: i64) -> Result<bool>;
}

#[derive(Clone)]
pub struct PostService {
    pool: SqlitePool,
}

impl PostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn attach_comments(conn: &mut SqliteConnection, post: Post) -> Result<PostWithComments> {
    let comments = comment_repo::list_comments_by_post(conn, post.id).await?;
    Ok(PostWithComments::new(post, comments))
}

async fn with_comments(
    conn: &mut SqliteConnection,
    post: Option<Post>,
) -> Result<Option<PostWithComments>> {
    match post {
        Some(post) => Ok(Some(attach_comments(conn, post).await?)),
        None => Ok(None),
    }
}

#[async_trait]
impl PostStore for PostService {
    async fn get_all(&self) -> Result<Vec<PostWithComments>> {
        let result: Result<Vec<PostWithComments>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let posts = post_repo::list_posts(&mut conn).await?;
            let comments = comment_repo::list_comments(&mut conn).await?;
            Ok(group_comments(posts, comments))
        }
        .await;

        record_store_op("post", "get_all", &result);
        result
    }

    async fn get_by_id(&self, post_id: i64) -> Result<Option<PostWithComments>> {
        let result: Result<Option<PostWithComments>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let post = post_repo::find_post_by_id(&mut conn, post_id).await?;
            with_comments(&mut conn, post).await
        }
        .await;

        record_store_op("post", "get_by_id", &result);
        result
    }

    async fn create(&self, post: NewPost) -> Result<PostWithComments> {
        let result: Result<PostWithComments> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let created = post_repo::insert_post(
                &mut conn,
                &post.title,
                &post.content,
                DEFAULT_AUTHOR,
                Utc::now(),
            )
            .await?;
            Ok(PostWithComments::new(created, Vec::new()))
        }
        .await;

        record_store_op("post", "create", &result);
        if let Ok(created) = &result {
            tracing::info!(post_id = created.post.id, "post created");
        }
        result
    }

    async fn update(&self, post: PostUpdate) -> Result<Option<PostWithComments>> {
        let result: Result<Option<PostWithComments>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let updated = post_repo::update_post(
                &mut conn,
                post.id,
                &post.title,
                &post.content,
                Utc::now(),
            )
            .await?;
            with_comments(&mut conn, updated).await
        }
        .await;

        record_store_op("post", "update", &result);
        if let Ok(Some(_)) = &result {
            tracing::info!(post_id = post.id, "post updated");
        }
        result
    }

    async fn patch(&self, post_id: i64, patch: PostPatch) -> Result<Option<PostWithComments>> {
        let result: Result<Option<PostWithComments>> = async {
            let mut conn = db::acquire(&self.pool).await?;
            let patched = post_repo::patch_post(
                &mut conn,
                post_id,
                patch_value(patch.title.as_deref()),
                patch_value(patch.content.as_deref()),
                Utc::now(),
            )
            .await?;
            with_comments(&mut conn, patched).await
        }
        .await;

        record_store_op("post", "patch", &result);
        if let Ok(Some(_)) = &result {
            tracing::info!(post_id, "post patched");
        }
        result
    }

    async fn delete(&self, post_id: i64) -> Result<bool> {
        let result: Result<bool> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(post_repo::delete_post(&mut conn, post_id).await?)
        }
        .await;

        record_store_op("post", "delete", &result);
        if matches!(result, Ok(true)) {
            tracing::info!(post_id, "post deleted");
        }
        result
    }

    async fn exists(&self, post_id: i64) -> Result<bool> {
        let result: Result<bool> = async {
            let mut conn = db::acquire(&self.pool).await?;
            Ok(post_repo::post_exists(&mut conn, post_id).await?)
        }
        .await;

        record_store_op("post", "exists", &result);
        result
    }
}

/// Attach each comment to its post, keeping both lists in their query order.
fn group_comments(posts: Vec<Post>, comments: Vec<Comment>) -> Vec<PostWithComments> {
    let mut by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_post.entry(comment.post_id).or_default().push(comment);
    }

    posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id).unwrap_or_default();
            PostWithComments::new(post, comments)
        })
        .collect()
}
