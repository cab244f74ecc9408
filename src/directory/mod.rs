/// Directory lookup backend
///
/// Defines the query contract against the IAM directory holding user and
/// group records, and the Keycloak implementation of it.

pub mod auth;
pub mod keycloak;

pub use auth::TokenProvider;
pub use keycloak::KeycloakClient;

use crate::error::ErsResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One resolved identity record, exactly as the directory returned it.
///
/// The schema is owned by the backend; the service only relies on the
/// presence of an `id` field and passes everything else through opaquely.
pub type EntityRecord = serde_json::Map<String, serde_json::Value>;

/// Minimal handle to a directory group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Directory backend trait
///
/// The five authenticated queries the resolution engine needs. Pure
/// request/response; no resolution logic lives behind this seam.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Search users whose email matches the given address
    async fn search_users_by_email(&self, email: &str) -> ErsResult<Vec<EntityRecord>>;

    /// Search users by username
    async fn search_users_by_username(&self, username: &str) -> ErsResult<Vec<EntityRecord>>;

    /// Search groups whose alias matches the given email-shaped string
    async fn search_groups_by_alias(&self, alias: &str) -> ErsResult<Vec<GroupLink>>;

    /// Fetch a group by id; None if the group no longer exists
    async fn get_group_by_id(&self, id: &str) -> ErsResult<Option<GroupLink>>;

    /// List a group's member records, in directory order
    async fn list_group_members(&self, group_id: &str) -> ErsResult<Vec<EntityRecord>>;
}
