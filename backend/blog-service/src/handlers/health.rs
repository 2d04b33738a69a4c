/// Health, readiness and liveness endpoints
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::time::Instant;

pub struct HealthState {
    db_pool: SqlitePool,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    async fn check_sqlite(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

/// GET /api/health
pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_sqlite().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("SQLite connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

/// GET /api/health/ready
pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.check_sqlite().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let (ready, check) = match result {
        Ok(_) => (
            true,
            ComponentCheck {
                status: ComponentStatus::Healthy,
                message: "SQLite query successful".to_string(),
                latency_ms,
            },
        ),
        Err(e) => (
            false,
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("SQLite query failed: {}", e),
                latency_ms,
            },
        ),
    };

    let response = ReadinessResponse {
        ready,
        status: check.status.clone(),
        checks: HashMap::from([("sqlite".to_string(), check)]),
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET /api/health/live
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Register the health routes; expects `web::Data<HealthState>` in app data
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_summary))
        .route("/api/health/ready", web::get().to(readiness_summary))
        .route("/api/health/live", web::get().to(liveness_check));
}
