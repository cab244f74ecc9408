/// Entity resolution endpoint
use crate::{
    context::AppContext,
    error::ErsResult,
    resolution::{EntityIdentifier, EntityResolution},
};
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Batch resolution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub entity_identifiers: Vec<EntityIdentifier>,
}

/// POST /resolve
///
/// Resolves a batch of entity identifiers against the directory. The
/// response array has the same length and order as the request, with each
/// original identifier echoed next to its resolved representations.
pub async fn resolve_entities(
    State(ctx): State<AppContext>,
    Json(request): Json<ResolutionRequest>,
) -> ErsResult<Json<Vec<EntityResolution>>> {
    debug!(
        batch_size = request.entity_identifiers.len(),
        "Received resolution request"
    );

    let resolutions = ctx.resolver.resolve(&request.entity_identifiers).await?;

    Ok(Json(resolutions))
}

/// Build resolution routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/resolve", post(resolve_entities))
}
