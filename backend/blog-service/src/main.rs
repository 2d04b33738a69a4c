use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use blog_service::handlers::{self, health::HealthState};
use blog_service::openapi::ApiDoc;
use blog_service::services::{CommentService, CommentStore, PostService, PostStore};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// Call the local health endpoint; used as a container health check.
async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://127.0.0.1:{}/api/health", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

/// Blog Service
///
/// # Routes
///
/// - `/api/posts/*` - Create, read, update, patch, delete posts
/// - `/api/posts/{post_id}/comments` - List and create comments of a post
/// - `/api/comments/*` - Read, update, patch, delete comments
/// - `/api/health*`, `/metrics`, `/api/openapi.json`, `/swagger-ui/`
#[actix_web::main]
async fn main() -> io::Result<()> {
    // `healthcheck-http` or legacy `healthcheck`
    if let Some(cmd) = std::env::args().nth(1) {
        if cmd == "healthcheck" || cmd == "healthcheck-http" {
            return run_healthcheck().await;
        }
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = blog_service::db::init_pool(&config.database)
        .await
        .map_err(|e| {
            tracing::error!("Database initialisation failed: {:#}", e);
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialise database: {e}"),
            )
        })?;

    let post_store: Arc<dyn PostStore> = Arc::new(PostService::new(db_pool.clone()));
    let comment_store: Arc<dyn CommentStore> = Arc::new(CommentService::new(db_pool.clone()));
    let post_store = web::Data::from(post_store);
    let comment_store = web::Data::from(comment_store);

    let health_state = web::Data::new(HealthState::new(db_pool.clone()));
    let openapi_doc = web::Data::new(ApiDoc::openapi());

    let http_bind_address = config.app.bind_address();
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(openapi_doc.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.get_ref().clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .app_data(post_store.clone())
            .app_data(comment_store.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(blog_service::metrics::serve_metrics))
            .configure(handlers::health::configure)
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .run();

    server.await?;

    db_pool.close().await;
    tracing::info!("blog-service shut down");
    Ok(())
}
