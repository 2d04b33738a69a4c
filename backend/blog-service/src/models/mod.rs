/// Data models for blog-service
///
/// This module defines structures for:
/// - Post: Top-level blog entries, always authored by `admin`
/// - Comment: Entries attached to exactly one post
/// - Request payloads for create, full update and partial update (PATCH)
///
/// Timestamps and the post author are assigned by the stores; none of the
/// request payloads carry them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Author recorded on every post; no authentication identity is modelled.
pub const DEFAULT_AUTHOR: &str = "admin";

/// Stored post row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    #[sqlx(rename = "created_at")]
    pub created_date: DateTime<Utc>,
    #[sqlx(rename = "updated_at")]
    pub updated_date: Option<DateTime<Utc>>,
}

/// Post together with the comments it owns, newest comment first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

impl PostWithComments {
    pub fn new(post: Post, comments: Vec<Comment>) -> Self {
        Self { post, comments }
    }
}

/// Stored comment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub content: String,
    #[sqlx(rename = "created_at")]
    pub created_date: DateTime<Utc>,
}

/// Request body for creating a post
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[validate(
        length(max = 200),
        custom(function = "crate::models::not_blank")
    )]
    pub title: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub content: String,
}

/// Request body for a full post update (PUT)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    /// Must match the id in the URL
    pub id: i64,
    #[validate(
        length(max = 200),
        custom(function = "crate::models::not_blank")
    )]
    pub title: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub content: String,
}

/// Request body for a partial post update (PATCH)
///
/// Absent, empty and whitespace-only fields are all treated as "not sent".
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPatch {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    /// Drop blank fields so validation only sees values that will be applied.
    pub fn normalized(self) -> Self {
        Self {
            title: keep_non_blank(self.title),
            content: keep_non_blank(self.content),
        }
    }
}

/// Request body for creating a comment; the post comes from the URL
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[validate(
        length(max = 100),
        custom(function = "crate::models::not_blank")
    )]
    pub name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(
        length(max = 1000),
        custom(function = "crate::models::not_blank")
    )]
    pub content: String,
}

/// Request body for a full comment update (PUT)
///
/// A `postId` in the body is ignored: comments are never re-parented.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdate {
    /// Must match the id in the URL
    pub id: i64,
    #[validate(
        length(max = 100),
        custom(function = "crate::models::not_blank")
    )]
    pub name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(
        length(max = 1000),
        custom(function = "crate::models::not_blank")
    )]
    pub content: String,
}

/// Request body for a partial comment update (PATCH)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentPatch {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
}

impl CommentPatch {
    /// Drop blank fields so validation only sees values that will be applied.
    pub fn normalized(self) -> Self {
        Self {
            name: keep_non_blank(self.name),
            email: keep_non_blank(self.email),
            content: keep_non_blank(self.content),
        }
    }
}

/// Value a PATCH field contributes, if any.
///
/// This is the single rule behind every partial update: a field is applied
/// only when it is present and contains something other than whitespace.
pub fn patch_value(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.trim().is_empty())
}

fn keep_non_blank(field: Option<String>) -> Option<String> {
    field.filter(|value| patch_value(Some(value.as_str())).is_some())
}

/// Reject empty and whitespace-only required strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
