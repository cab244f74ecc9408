/// Group expansion
///
/// Resolves a group reference to its constituent member records via the
/// directory backend.
use crate::{
    directory::{DirectoryBackend, EntityRecord, GroupLink},
    error::ErsResult,
    metrics,
};
use std::sync::Arc;
use tracing::debug;

/// Expands group references into member entity records
#[derive(Clone)]
pub struct GroupExpander {
    backend: Arc<dyn DirectoryBackend>,
}

impl GroupExpander {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        Self { backend }
    }

    /// Expand one group into its member records, in directory order.
    ///
    /// One level only: members that are themselves groups come back as
    /// opaque records and are not expanded further. A group that no longer
    /// exists (deleted between search and fetch) expands to an empty
    /// sequence rather than failing the request.
    pub async fn expand(&self, group: &GroupLink) -> ErsResult<Vec<EntityRecord>> {
        let canonical = match self.backend.get_group_by_id(&group.id).await? {
            Some(group) => group,
            None => {
                debug!(group_id = %group.id, "Group vanished between search and fetch");
                metrics::record_group_expansion("vanished", 0);
                return Ok(Vec::new());
            }
        };

        let members = self.backend.list_group_members(&canonical.id).await?;
        metrics::record_group_expansion("expanded", members.len());
        Ok(members)
    }
}
