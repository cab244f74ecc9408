/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    directory::{DirectoryBackend, KeycloakClient},
    error::ErsResult,
    rate_limit::{RateLimitConfig, RateLimiter},
    resolution::EntityResolver,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub keycloak: Arc<KeycloakClient>,
    pub resolver: Arc<EntityResolver>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: ServerConfig) -> ErsResult<Self> {
        // Validate configuration
        config.validate()?;

        // Initialize the directory client; the resolver shares it as its
        // lookup backend
        let keycloak = Arc::new(KeycloakClient::new(config.keycloak.clone())?);
        let backend: Arc<dyn DirectoryBackend> = Arc::clone(&keycloak) as Arc<dyn DirectoryBackend>;
        let resolver = Arc::new(EntityResolver::new(backend));

        // Initialize rate limiter
        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::from(&config.rate_limit)));

        Ok(Self {
            config: Arc::new(config),
            keycloak,
            resolver,
            rate_limiter,
        })
    }
}
