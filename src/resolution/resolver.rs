/// Resolution orchestrator
///
/// Validates a batch of entity identifiers, runs each one through the
/// classifier and the lookup path it plans, and assembles the response in
/// input order.
use crate::{
    directory::DirectoryBackend,
    error::{ErsError, ErsResult},
    metrics,
    resolution::{
        classifier::{classify, LookupPlan},
        expander::GroupExpander,
        EntityIdentifier, EntityResolution, IdentifierKind,
    },
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates entity resolution against the directory backend
#[derive(Clone)]
pub struct EntityResolver {
    backend: Arc<dyn DirectoryBackend>,
    expander: GroupExpander,
}

impl EntityResolver {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        let expander = GroupExpander::new(Arc::clone(&backend));
        Self { backend, expander }
    }

    /// Resolve a batch of identifiers.
    ///
    /// The whole batch is validated before any directory call; the first
    /// invalid element rejects the request. Per-identifier resolutions are
    /// independent and run concurrently; the response always has the same
    /// length and order as the input, with each original identifier echoed
    /// next to its representations. The first upstream failure fails the
    /// whole batch and drops in-flight sibling lookups.
    pub async fn resolve(
        &self,
        identifiers: &[EntityIdentifier],
    ) -> ErsResult<Vec<EntityResolution>> {
        let kinds = identifiers
            .iter()
            .map(validate_identifier)
            .collect::<ErsResult<Vec<_>>>()?;

        debug!(batch_size = identifiers.len(), "Resolving identifier batch");

        try_join_all(
            identifiers
                .iter()
                .zip(kinds)
                .map(|(identifier, kind)| self.resolve_one(identifier, kind)),
        )
        .await
    }

    /// Resolve a single identifier per its lookup plan
    async fn resolve_one(
        &self,
        original: &EntityIdentifier,
        kind: IdentifierKind,
    ) -> ErsResult<EntityResolution> {
        let representations = match classify(kind, &original.identifier) {
            LookupPlan::UserOnly { username } => {
                self.backend.search_users_by_username(&username).await?
            }
            LookupPlan::UserAndGroupAlias { email } => {
                // Direct user matches come first, group expansions after;
                // either side may legitimately be empty
                let mut representations = self.backend.search_users_by_email(&email).await?;
                for group in self.backend.search_groups_by_alias(&email).await? {
                    representations.extend(self.expander.expand(&group).await?);
                }
                representations
            }
        };

        metrics::record_resolution(
            kind.as_str(),
            if representations.is_empty() { "miss" } else { "hit" },
        );

        Ok(EntityResolution {
            original_identifier: original.clone(),
            entity_representations: representations,
        })
    }
}

/// Check one identifier against the recognized kinds; runs before any I/O
fn validate_identifier(identifier: &EntityIdentifier) -> ErsResult<IdentifierKind> {
    if identifier.identifier.is_empty() {
        return Err(ErsError::Validation("Identifier cannot be empty".to_string()));
    }

    IdentifierKind::parse(&identifier.kind).ok_or_else(|| {
        ErsError::Validation(format!("Unrecognized identifier type: {}", identifier.kind))
    })
}
