/// Metrics and telemetry for the entity resolution service
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - HTTP request counts and latencies
/// - Resolution outcomes per identifier kind
/// - Directory (Keycloak admin API) call counts
/// - Group expansion counts and sizes

use lazy_static::lazy_static;
use prometheus::{
    register_gauge, register_histogram, register_histogram_vec, register_int_counter_vec,
    Encoder, Gauge, Histogram, HistogramVec, IntCounterVec, TextEncoder,
};
use std::time::Instant;

lazy_static! {
    /// Process start, for the uptime gauge
    static ref STARTED_AT: Instant = Instant::now();

    // ========== HTTP Metrics ==========

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latencies in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // ========== Resolution Metrics ==========

    /// Resolved identifiers by kind and outcome (hit/miss)
    pub static ref RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resolutions_total",
        "Total number of identifier resolutions",
        &["kind", "outcome"]
    )
    .unwrap();

    // ========== Directory Metrics ==========

    /// Directory calls by operation and status
    pub static ref DIRECTORY_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "directory_calls_total",
        "Total number of directory backend calls",
        &["operation", "status"]
    )
    .unwrap();

    /// Group expansions by status (expanded/vanished)
    pub static ref GROUP_EXPANSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "group_expansions_total",
        "Total number of group expansions",
        &["status"]
    )
    .unwrap();

    /// Members returned per expansion
    pub static ref GROUP_EXPANSION_MEMBERS: Histogram = register_histogram!(
        "group_expansion_members",
        "Number of members returned per group expansion",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]
    )
    .unwrap();

    // ========== Error Metrics ==========

    /// Errors by error code
    pub static ref ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "errors_total",
        "Total number of errors returned to callers",
        &["error_code"]
    )
    .unwrap();

    // ========== System Metrics ==========

    /// Application uptime in seconds
    pub static ref UPTIME_SECONDS: Gauge = register_gauge!(
        "uptime_seconds",
        "Application uptime in seconds"
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    UPTIME_SECONDS.set(STARTED_AT.elapsed().as_secs_f64());

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

/// Record one identifier resolution
pub fn record_resolution(kind: &str, outcome: &str) {
    RESOLUTIONS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Record a directory backend call
pub fn record_directory_call(operation: &str, status: &str) {
    DIRECTORY_CALLS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
}

/// Record a group expansion
pub fn record_group_expansion(status: &str, member_count: usize) {
    GROUP_EXPANSIONS_TOTAL.with_label_values(&[status]).inc();
    GROUP_EXPANSION_MEMBERS.observe(member_count as f64);
}

/// Record an error returned to a caller
pub fn record_error(error_code: &str) {
    ERRORS_TOTAL.with_label_values(&[error_code]).inc();
}
