//! Pool metrics: connection counts, acquire latency and acquire failures.

use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use sqlx::{pool::PoolConnection, Sqlite, SqlitePool};
use std::time::Instant;

// SQLite acquisitions are usually sub-millisecond; the upper buckets only
// fill up when writers queue behind the single in-memory connection.
const ACQUIRE_BUCKETS: &[f64] = &[0.0001, 0.0005, 0.001, 0.005, 0.025, 0.1, 0.5, 2.5, 10.0];

lazy_static::lazy_static! {
    /// Pool connections by state (`idle`, `in_use`, `max`)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref DB_POOL_ACQUIRE_DURATION: HistogramVec = register_histogram_vec!(
        "db_pool_acquire_duration_seconds",
        "Time spent waiting for a pooled connection",
        &["service"],
        ACQUIRE_BUCKETS.to_vec()
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref DB_POOL_CONNECTION_ERRORS: IntCounterVec = register_int_counter_vec!(
        "db_pool_connection_errors_total",
        "Failed connection acquisitions by cause",
        &["service", "error_type"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub(crate) fn update_pool_metrics(pool: &SqlitePool, service: &str) {
    let open = pool.size();
    let idle = pool.num_idle() as u32;
    let states = [
        ("idle", idle),
        ("in_use", open.saturating_sub(idle)),
        ("max", pool.options().get_max_connections()),
    ];

    for (state, count) in states {
        DB_POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(i64::from(count));
    }
}

fn acquire_error_kind(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::PoolTimedOut => "timeout",
        sqlx::Error::PoolClosed => "closed",
        sqlx::Error::Io(_) => "io",
        _ => "other",
    }
}

/// `pool.acquire()` that records how long the caller waited and why it failed.
///
/// ```no_run
/// # use db_pool::{acquire_with_metrics, create_pool, DbConfig};
/// # async fn run() -> Result<(), sqlx::Error> {
/// # let pool = create_pool(DbConfig::for_service("blog-service", "sqlite::memory:")).await?;
/// let mut conn = acquire_with_metrics(&pool, "blog-service").await?;
/// sqlx::query("SELECT 1").execute(&mut *conn).await?;
/// # Ok(())
/// # }
/// ```
pub async fn acquire_with_metrics(
    pool: &SqlitePool,
    service: &str,
) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
    let started = Instant::now();
    let acquired = pool.acquire().await;
    DB_POOL_ACQUIRE_DURATION
        .with_label_values(&[service])
        .observe(started.elapsed().as_secs_f64());

    acquired.map_err(|err| {
        DB_POOL_CONNECTION_ERRORS
            .with_label_values(&[service, acquire_error_kind(&err)])
            .inc();
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_errors_are_classified() {
        assert_eq!(acquire_error_kind(&sqlx::Error::PoolTimedOut), "timeout");
        assert_eq!(acquire_error_kind(&sqlx::Error::PoolClosed), "closed");
        assert_eq!(acquire_error_kind(&sqlx::Error::RowNotFound), "other");
    }
}
