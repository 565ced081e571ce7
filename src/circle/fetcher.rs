use crate::circle::client::{BuildSource, PAGE_SIZE};
use crate::circle::parser::RawBuild;
use crate::config::FetchPolicy;
use crate::error::FetchError;
use crate::project::ProjectRef;
use std::sync::Arc;

/// Fetches the latest page of builds and applies the configured [`FetchPolicy`].
pub struct BuildFetcher {
    source: Arc<dyn BuildSource>,
    policy: FetchPolicy,
}

impl BuildFetcher {
    pub fn new(source: Arc<dyn BuildSource>, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// Under [`FetchPolicy::Degrade`] this never returns `Err`.
    pub async fn fetch(&self, project: &ProjectRef) -> Result<Vec<RawBuild>, FetchError> {
        match self.source.recent_builds(project, PAGE_SIZE, 0).await {
            Ok(builds) => Ok(builds),
            Err(e) => match self.policy {
                FetchPolicy::Degrade => {
                    tracing::warn!(project = %project, "fetching builds failed, showing none: {e}");
                    Ok(Vec::new())
                }
                FetchPolicy::Propagate => Err(e),
            },
        }
    }
}
