/// OpenAPI documentation for Blog Service
use crate::models::{
    Comment, CommentPatch, CommentUpdate, NewComment, NewPost, Post, PostPatch, PostUpdate,
    PostWithComments,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "Posts and comments for a single-author blog. Posts are always authored by `admin`; comments belong to exactly one post and are removed with it.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    components(schemas(
        Post,
        PostWithComments,
        NewPost,
        PostUpdate,
        PostPatch,
        Comment,
        NewComment,
        CommentUpdate,
        CommentPatch,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post creation, retrieval, updates, and deletion"),
        (name = "comments", description = "Comments on posts"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_blog_schemas() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Blog Service API");

        let components = doc.components.expect("components");
        for name in ["Post", "PostWithComments", "Comment", "NewComment", "PostPatch"] {
            assert!(components.schemas.contains_key(name), "missing {name}");
        }
    }
}
