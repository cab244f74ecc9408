/// Configuration management for the entity resolution service
use crate::error::{ErsError, ErsResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub keycloak: KeycloakConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Keycloak directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    /// Base URL of the Keycloak deployment (no trailing slash)
    pub url: String,
    pub realm: String,
    /// Service-account client used for admin API queries
    pub client_id: String,
    pub client_secret: String,
    /// Pre-Quarkus Keycloak served everything under an /auth prefix
    pub legacy: bool,
    /// Per-request timeout for directory calls, in seconds
    pub request_timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ErsResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ERS_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("ERS_PORT")
            .unwrap_or_else(|_| "7070".to_string())
            .parse()
            .map_err(|_| ErsError::Validation("Invalid port number".to_string()))?;

        let keycloak_url = env::var("ERS_KEYCLOAK_URL")
            .map_err(|_| ErsError::Validation("Keycloak URL required".to_string()))?;
        let realm = env::var("ERS_KEYCLOAK_REALM").unwrap_or_else(|_| "master".to_string());
        let client_id = env::var("ERS_KEYCLOAK_CLIENT_ID")
            .map_err(|_| ErsError::Validation("Keycloak client id required".to_string()))?;
        let client_secret = env::var("ERS_KEYCLOAK_CLIENT_SECRET")
            .map_err(|_| ErsError::Validation("Keycloak client secret required".to_string()))?;
        let legacy = env::var("ERS_KEYCLOAK_LEGACY")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);
        let request_timeout_secs = env::var("ERS_KEYCLOAK_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let rate_limit_enabled = env::var("ERS_RATE_LIMITS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let requests_per_second = env::var("ERS_RATE_LIMIT_REQUESTS_PER_SECOND")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .unwrap_or(50);
        let burst_size = env::var("ERS_RATE_LIMIT_BURST_SIZE")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .unwrap_or(25);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            keycloak: KeycloakConfig {
                url: keycloak_url.trim_end_matches('/').to_string(),
                realm,
                client_id,
                client_secret,
                legacy,
                request_timeout_secs,
            },
            rate_limit: RateLimitSettings {
                enabled: rate_limit_enabled,
                requests_per_second,
                burst_size,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ErsResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ErsError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.keycloak.url.is_empty() {
            return Err(ErsError::Validation(
                "Keycloak URL cannot be empty".to_string(),
            ));
        }

        if !self.keycloak.url.starts_with("http://") && !self.keycloak.url.starts_with("https://") {
            return Err(ErsError::Validation(
                "Keycloak URL must be an http(s) URL".to_string(),
            ));
        }

        if self.keycloak.realm.is_empty() {
            return Err(ErsError::Validation("Realm cannot be empty".to_string()));
        }

        if self.keycloak.client_id.is_empty() || self.keycloak.client_secret.is_empty() {
            return Err(ErsError::Validation(
                "Keycloak client credentials cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 7070,
            },
            keycloak: KeycloakConfig {
                url: "http://keycloak:8080".to_string(),
                realm: "tdf".to_string(),
                client_id: "c1".to_string(),
                client_secret: "cs".to_string(),
                legacy: false,
                request_timeout_secs: 10,
            },
            rate_limit: RateLimitSettings {
                enabled: true,
                requests_per_second: 50,
                burst_size: 25,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_missing_realm_rejected() {
        let mut config = test_config();
        config.keycloak.realm = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut config = test_config();
        config.keycloak.url = "keycloak:8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut config = test_config();
        config.keycloak.client_secret = String::new();
        assert!(config.validate().is_err());
    }
}
