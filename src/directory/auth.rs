/// Admin token acquisition for the Keycloak directory
///
/// Obtains access tokens for the admin API via the OAuth2 client-credentials
/// grant and caches them in-process until shortly before expiry. One provider
/// is constructed per process and shared by reference; there is no ambient
/// global credential state.
use crate::{
    config::KeycloakConfig,
    error::{ErsError, ErsResult},
};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Refresh this long before the token actually expires
const EXPIRY_LEEWAY: Duration = Duration::from_secs(30);

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    60
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_LEEWAY < self.expires_at
    }
}

/// Client-credentials token provider for the Keycloak admin API
pub struct TokenProvider {
    http_client: reqwest::Client,
    config: KeycloakConfig,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a new token provider sharing the lookup client's HTTP client
    pub fn new(http_client: reqwest::Client, config: KeycloakConfig) -> Self {
        Self {
            http_client,
            config,
            cached: RwLock::new(None),
        }
    }

    /// Token endpoint URL, honoring the legacy /auth path prefix
    fn token_url(&self) -> String {
        let prefix = if self.config.legacy { "/auth" } else { "" };
        format!(
            "{}{}/realms/{}/protocol/openid-connect/token",
            self.config.url, prefix, self.config.realm
        )
    }

    /// Get a valid access token, refreshing if the cached one is stale
    pub async fn access_token(&self) -> ErsResult<String> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let mut slot = self.cached.write().await;
        // Another task may have refreshed while we waited for the write lock
        if let Some(cached) = slot.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *slot = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(access_token)
    }

    /// Fetch a fresh token via the client-credentials grant
    async fn fetch_token(&self) -> ErsResult<TokenResponse> {
        let url = self.token_url();
        debug!("Requesting admin token from {}", url);

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("Token endpoint unreachable: {}", e);
                ErsError::Upstream(format!("Failed to reach token endpoint: {}", e))
            })?;

        if !response.status().is_success() {
            warn!("Token endpoint returned {}", response.status());
            return Err(ErsError::Upstream(format!(
                "Token endpoint returned error: {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse token response: {}", e);
            ErsError::Upstream(format!("Invalid token response: {}", e))
        })
    }
}
