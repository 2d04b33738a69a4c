/// Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::models::{NewPost, PostPatch, PostUpdate};
use crate::services::PostStore;
use actix_web::{http::header, web, HttpResponse};
use validator::Validate;

/// List all posts with their comments
/// GET /api/posts
pub async fn list_posts(posts: web::Data<dyn PostStore>) -> Result<HttpResponse> {
    let all = posts.get_all().await?;
    Ok(HttpResponse::Ok().json(all))
}

/// Get a post by ID
/// GET /api/posts/{id}
pub async fn get_post(
    posts: web::Data<dyn PostStore>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    match posts.get_by_id(post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {}", post_id))),
    }
}

/// Create a new post; the author is always `admin`
/// POST /api/posts
pub async fn create_post(
    posts: web::Data<dyn PostStore>,
    req: web::Json<NewPost>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let created = posts.create(req).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/posts/{}", created.post.id)))
        .json(created))
}

/// Replace title and content of a post
/// PUT /api/posts/{id}
pub async fn update_post(
    posts: web::Data<dyn PostStore>,
    post_id: web::Path<i64>,
    req: web::Json<PostUpdate>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let req = req.into_inner();
    if req.id != post_id {
        return Err(AppError::BadRequest(
            "Id mismatch between URL and body.".to_string(),
        ));
    }
    req.validate()?;

    match posts.update(req).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {}", post_id))),
    }
}

/// Partially update a post; blank fields are left as stored
/// PATCH /api/posts/{id}
pub async fn patch_post(
    posts: web::Data<dyn PostStore>,
    post_id: web::Path<i64>,
    req: web::Json<PostPatch>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let patch = req.into_inner().normalized();
    patch.validate()?;

    match posts.patch(post_id, patch).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {}", post_id))),
    }
}

/// Delete a post and its comments
/// DELETE /api/posts/{id}
pub async fn delete_post(
    posts: web::Data<dyn PostStore>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    if posts.delete(post_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("post {}", post_id)))
    }
}
