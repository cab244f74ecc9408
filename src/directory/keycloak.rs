/// Keycloak implementation of the directory backend
///
/// Queries the Keycloak admin REST API for user and group records. Pure
/// request/response; the resolution engine owns all dispatch and merge logic.
use crate::{
    config::KeycloakConfig,
    directory::{auth::TokenProvider, DirectoryBackend, EntityRecord, GroupLink},
    error::{ErsError, ErsResult},
    metrics,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Keycloak admin API client
pub struct KeycloakClient {
    http_client: reqwest::Client,
    config: KeycloakConfig,
    tokens: TokenProvider,
}

impl KeycloakClient {
    /// Create a new client for the configured Keycloak deployment
    pub fn new(config: KeycloakConfig) -> ErsResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("entity-resolution/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ErsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let tokens = TokenProvider::new(http_client.clone(), config.clone());

        Ok(Self {
            http_client,
            config,
            tokens,
        })
    }

    /// Admin API URL for the given path, honoring the legacy /auth prefix
    fn admin_url(&self, path: &str) -> String {
        let prefix = if self.config.legacy { "/auth" } else { "" };
        format!(
            "{}{}/admin/realms/{}/{}",
            self.config.url, prefix, self.config.realm, path
        )
    }

    /// Public realm endpoint, used as a reachability probe
    fn realm_url(&self) -> String {
        let prefix = if self.config.legacy { "/auth" } else { "" };
        format!("{}{}/realms/{}", self.config.url, prefix, self.config.realm)
    }

    /// Authenticated GET returning a parsed JSON body.
    ///
    /// A 404 answer is returned as None; any other non-success status is an
    /// upstream error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> ErsResult<Option<T>> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                metrics::record_directory_call(operation, "error");
                warn!("Directory unreachable during {}: {}", operation, e);
                ErsError::Upstream(format!("Directory unreachable: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            metrics::record_directory_call(operation, "not_found");
            return Ok(None);
        }

        if !response.status().is_success() {
            metrics::record_directory_call(operation, "error");
            warn!("Directory returned {} during {}", response.status(), operation);
            return Err(ErsError::Upstream(format!(
                "Directory returned error: {}",
                response.status()
            )));
        }

        let parsed = response.json().await.map_err(|e| {
            metrics::record_directory_call(operation, "error");
            warn!("Unparsable directory response during {}: {}", operation, e);
            ErsError::Upstream(format!("Invalid directory response: {}", e))
        })?;

        metrics::record_directory_call(operation, "ok");
        Ok(Some(parsed))
    }

    /// Check that the realm endpoint answers, for the readiness probe
    pub async fn check_reachable(&self) -> ErsResult<()> {
        let response = self
            .http_client
            .get(self.realm_url())
            .send()
            .await
            .map_err(|e| ErsError::Upstream(format!("Directory unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(ErsError::Upstream(format!(
                "Realm endpoint returned: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl DirectoryBackend for KeycloakClient {
    async fn search_users_by_email(&self, email: &str) -> ErsResult<Vec<EntityRecord>> {
        debug!("Searching users by email");
        let users = self
            .get_json("search_users_by_email", &self.admin_url("users"), &[("email", email)])
            .await?;
        Ok(users.unwrap_or_default())
    }

    async fn search_users_by_username(&self, username: &str) -> ErsResult<Vec<EntityRecord>> {
        debug!("Searching users by username");
        let users = self
            .get_json(
                "search_users_by_username",
                &self.admin_url("users"),
                &[("username", username)],
            )
            .await?;
        Ok(users.unwrap_or_default())
    }

    async fn search_groups_by_alias(&self, alias: &str) -> ErsResult<Vec<GroupLink>> {
        debug!("Searching groups by alias");
        let groups = self
            .get_json("search_groups_by_alias", &self.admin_url("groups"), &[("search", alias)])
            .await?;
        Ok(groups.unwrap_or_default())
    }

    async fn get_group_by_id(&self, id: &str) -> ErsResult<Option<GroupLink>> {
        debug!(group_id = %id, "Fetching group by id");
        self.get_json("get_group_by_id", &self.admin_url(&format!("groups/{}", id)), &[])
            .await
    }

    async fn list_group_members(&self, group_id: &str) -> ErsResult<Vec<EntityRecord>> {
        debug!(group_id = %group_id, "Listing group members");
        // A vanished group is an empty membership, not a failure
        let members = self
            .get_json(
                "list_group_members",
                &self.admin_url(&format!("groups/{}/members", group_id)),
                &[],
            )
            .await?;
        Ok(members.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(legacy: bool) -> KeycloakClient {
        KeycloakClient::new(KeycloakConfig {
            url: "http://keycloak:8080".to_string(),
            realm: "tdf".to_string(),
            client_id: "c1".to_string(),
            client_secret: "cs".to_string(),
            legacy,
            request_timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_admin_url_modern_layout() {
        let client = test_client(false);
        assert_eq!(
            client.admin_url("users"),
            "http://keycloak:8080/admin/realms/tdf/users"
        );
        assert_eq!(
            client.admin_url("groups/group1-uuid/members"),
            "http://keycloak:8080/admin/realms/tdf/groups/group1-uuid/members"
        );
    }

    #[test]
    fn test_admin_url_legacy_layout() {
        let client = test_client(true);
        assert_eq!(
            client.admin_url("groups"),
            "http://keycloak:8080/auth/admin/realms/tdf/groups"
        );
    }

    #[test]
    fn test_realm_url() {
        assert_eq!(test_client(false).realm_url(), "http://keycloak:8080/realms/tdf");
        assert_eq!(
            test_client(true).realm_url(),
            "http://keycloak:8080/auth/realms/tdf"
        );
    }
}
