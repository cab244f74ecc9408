/// HTTP server setup and routing
use crate::{
    api::middleware::track_http_metrics,
    context::AppContext,
    error::{ErsError, ErsResult},
    metrics,
    rate_limit::rate_limit_middleware,
};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Prometheus scrape endpoint (no middleware)
        .route("/metrics", get(serve_metrics))
        // API routes - merge before with_state
        .merge(crate::api::routes())
        // Provide state - converts Router<AppContext> to Router<()>
        .with_state(ctx.clone())
        // Apply rate limiting middleware (after state so it can access AppContext)
        .layer(middleware::from_fn_with_state(ctx, rate_limit_middleware))
        .layer(middleware::from_fn(track_http_metrics))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Prometheus text exposition handler
async fn serve_metrics() -> String {
    metrics::render_metrics()
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ErsResult<()> {
    let addr = format!("{}:{}", ctx.config.service.hostname, ctx.config.service.port);

    info!("Entity resolution service listening on {}", addr);
    info!("   Directory: {} (realm {})", ctx.config.keycloak.url, ctx.config.keycloak.realm);

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ErsError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ErsError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
