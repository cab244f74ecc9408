/// Test support: in-process fake Keycloak
///
/// Serves the subset of the Keycloak surface the lookup client touches,
/// backed by fixture maps keyed the way the backend keys them (raw query
/// string for searches, group id for fetches). Unregistered admin requests
/// answer 500 so tests surface unexpected lookups as upstream errors.
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

const TOKEN_RESP: &str = r#"{
  "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test-token",
  "token_type": "Bearer",
  "expires_in": 3600
}"#;

/// Fixture-backed fake Keycloak deployment
#[derive(Clone, Default)]
pub struct FakeKeycloak {
    /// Raw user-search query string -> JSON body
    pub user_search: HashMap<String, String>,
    /// Raw group-search query string -> JSON body
    pub group_search: HashMap<String, String>,
    /// Group id -> JSON body
    pub group_by_id: HashMap<String, String>,
    /// Group id -> JSON members body
    pub group_members: HashMap<String, String>,
    requests: Arc<AtomicUsize>,
}

impl FakeKeycloak {
    /// Total requests observed, token endpoint included
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Serve on an ephemeral local port; returns the base URL
    pub async fn spawn(&self) -> String {
        let router = self.clone().router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn router(self) -> Router {
        Router::new()
            .route("/realms/tdf", get(realm_info))
            .route("/realms/tdf/protocol/openid-connect/token", post(token))
            .route("/admin/realms/tdf/users", get(search_users))
            .route("/admin/realms/tdf/groups", get(search_groups))
            .route("/admin/realms/tdf/groups/:id", get(group_by_id))
            .route("/admin/realms/tdf/groups/:id/members", get(group_members))
            .with_state(self)
    }
}

fn fixture_response(fixtures: &HashMap<String, String>, key: &str) -> Result<Json<serde_json::Value>, StatusCode> {
    match fixtures.get(key) {
        Some(body) => Ok(Json(serde_json::from_str(body).unwrap())),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn realm_info(State(fake): State<FakeKeycloak>) -> Json<serde_json::Value> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"realm": "tdf"}))
}

async fn token(State(fake): State<FakeKeycloak>) -> Json<serde_json::Value> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::from_str(TOKEN_RESP).unwrap())
}

async fn search_users(
    State(fake): State<FakeKeycloak>,
    RawQuery(query): RawQuery,
) -> Result<Json<serde_json::Value>, StatusCode> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    fixture_response(&fake.user_search, &query.unwrap_or_default())
}

async fn search_groups(
    State(fake): State<FakeKeycloak>,
    RawQuery(query): RawQuery,
) -> Result<Json<serde_json::Value>, StatusCode> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    fixture_response(&fake.group_search, &query.unwrap_or_default())
}

async fn group_by_id(
    State(fake): State<FakeKeycloak>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    match fake.group_by_id.get(&id) {
        Some(body) => Ok(Json(serde_json::from_str(body).unwrap())),
        // Fetching an unregistered group models the deleted-group case
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn group_members(
    State(fake): State<FakeKeycloak>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    fixture_response(&fake.group_members, &id)
}
