/// HTTP middleware
use crate::metrics;
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Record request count and latency for every handled request
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
