/// Health check endpoints for Kubernetes liveness and readiness probes
///
/// Liveness answers whenever the process can serve a request; readiness
/// additionally checks that the configured directory realm is reachable.
use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness probe - Kubernetes liveness check
///
/// If we can respond, we're alive.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - Kubernetes readiness check
///
/// Not ready when the directory realm endpoint does not answer; resolution
/// requests would only turn into upstream errors.
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Err(e) = ctx.keycloak.check_reachable().await {
        tracing::warn!(error = %e, "readiness_probe_failed: directory unreachable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
