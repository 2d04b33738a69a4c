/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::models::{CommentPatch, CommentUpdate, NewComment};
use crate::services::{CommentStore, PostStore};
use actix_web::{http::header, web, HttpResponse};
use validator::Validate;

/// List every comment
/// GET /api/comments
pub async fn list_comments(comments: web::Data<dyn CommentStore>) -> Result<HttpResponse> {
    let all = comments.get_all().await?;
    Ok(HttpResponse::Ok().json(all))
}

/// Get a single comment
/// GET /api/comments/{id}
pub async fn get_comment(
    comments: web::Data<dyn CommentStore>,
    comment_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    match comments.get_by_id(comment_id).await? {
        Some(comment) => Ok(HttpResponse::Ok().json(comment)),
        None => Err(AppError::NotFound(format!("comment {}", comment_id))),
    }
}

/// Get comments for a post
/// GET /api/posts/{post_id}/comments
pub async fn get_post_comments(
    posts: web::Data<dyn PostStore>,
    comments: web::Data<dyn CommentStore>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    if !posts.exists(post_id).await? {
        return Err(AppError::NotFound(format!("post {}", post_id)));
    }

    let comments = comments.get_by_post_id(post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Create a new comment under an existing post
/// POST /api/posts/{post_id}/comments
pub async fn create_comment(
    posts: web::Data<dyn PostStore>,
    comments: web::Data<dyn CommentStore>,
    post_id: web::Path<i64>,
    req: web::Json<NewComment>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let req = req.into_inner();
    req.validate()?;

    if !posts.exists(post_id).await? {
        return Err(AppError::NotFound(format!("post {}", post_id)));
    }

    let comment = comments.create(post_id, req).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/comments/{}", comment.id)))
        .json(comment))
}

/// Replace name, email and content of a comment
/// PUT /api/comments/{id}
pub async fn update_comment(
    comments: web::Data<dyn CommentStore>,
    comment_id: web::Path<i64>,
    req: web::Json<CommentUpdate>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    let req = req.into_inner();
    if req.id != comment_id {
        return Err(AppError::BadRequest(
            "ID in URL must match ID in body".to_string(),
        ));
    }
    req.validate()?;

    match comments.update(req).await? {
        Some(comment) => Ok(HttpResponse::Ok().json(comment)),
        None => Err(AppError::NotFound(format!("comment {}", comment_id))),
    }
}

/// Partially update a comment; blank fields are left as stored
/// PATCH /api/comments/{id}
pub async fn patch_comment(
    comments: web::Data<dyn CommentStore>,
    comment_id: web::Path<i64>,
    req: web::Json<CommentPatch>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    let patch = req.into_inner().normalized();
    patch.validate()?;

    match comments.patch(comment_id, patch).await? {
        Some(comment) => Ok(HttpResponse::Ok().json(comment)),
        None => Err(AppError::NotFound(format!("comment {}", comment_id))),
    }
}

/// Delete a comment
/// DELETE /api/comments/{id}
pub async fn delete_comment(
    comments: web::Data<dyn CommentStore>,
    comment_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    if comments.delete(comment_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("comment {}", comment_id)))
    }
}
