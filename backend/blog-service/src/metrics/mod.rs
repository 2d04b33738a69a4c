//! Prometheus metrics for blog-service.
//!
//! Exposes store operation counters and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Store operations segmented by entity (post/comment), operation and outcome.
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_store_operations_total",
        "Store operations segmented by entity, operation and outcome",
        &["entity", "operation", "outcome"]
    )
    .expect("failed to register blog_store_operations_total");
}

/// Count one store call; errors are counted separately from successes.
pub fn record_store_op<T, E>(entity: &str, operation: &str, result: &Result<T, E>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[entity, operation, outcome])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
