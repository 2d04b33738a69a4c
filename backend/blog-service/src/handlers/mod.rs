/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Posts: list, read, create, full update, partial update, delete
/// - Comments: the same set, plus listing and creation under a post
/// - Health: summary, readiness and liveness checks
///
/// Handlers depend on the `PostStore` / `CommentStore` traits, registered as
/// `web::Data<dyn PostStore>` and `web::Data<dyn CommentStore>`.
pub mod comments;
pub mod health;
pub mod posts;

use crate::error::AppError;
use actix_web::web;

// Re-export handler functions at module level
pub use comments::{
    create_comment, delete_comment, get_comment, get_post_comments, list_comments, patch_comment,
    update_comment,
};
pub use posts::{create_post, delete_post, get_post, list_posts, patch_post, update_post};

/// JSON extractor settings: malformed bodies become `AppError::BadRequest`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Register the blog API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/api/posts")
                .route(web::get().to(list_posts))
                .route(web::post().to(create_post)),
        )
        .service(
            web::resource("/api/posts/{id}")
                .route(web::get().to(get_post))
                .route(web::put().to(update_post))
                .route(web::patch().to(patch_post))
                .route(web::delete().to(delete_post)),
        )
        .service(
            web::resource("/api/posts/{post_id}/comments")
                .route(web::get().to(get_post_comments))
                .route(web::post().to(create_comment)),
        )
        .service(web::resource("/api/comments").route(web::get().to(list_comments)))
        .service(
            web::resource("/api/comments/{id}")
                .route(web::get().to(get_comment))
                .route(web::put().to(update_comment))
                .route(web::patch().to(patch_comment))
                .route(web::delete().to(delete_comment)),
        );
}
