/// Business logic layer for blog-service
///
/// This module provides the two stores the HTTP layer talks to:
/// - Post store: listing with comments, create, update, patch, delete, exists
/// - Comment store: the same set plus listing by post
///
/// Both are traits so handlers can be exercised against any implementation;
/// the SQL-backed services are the production ones.
pub mod comments;
pub mod posts;

// Re-export commonly used services
pub use comments::{CommentService, CommentStore};
pub use posts::{PostService, PostStore};
