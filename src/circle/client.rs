use crate::circle::parser::{self, RawBuild};
use crate::config::Config;
use crate::error::FetchError;
use crate::project::ProjectRef;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;

/// Number of builds requested per refresh.
pub const PAGE_SIZE: usize = 30;

const VCS_TYPE: &str = "github";
const USER_AGENT: &str = concat!("ccw/", env!("CARGO_PKG_VERSION"));

/// Anything that can list the most recent builds of a project branch.
#[async_trait]
pub trait BuildSource: Send + Sync {
    async fn recent_builds(
        &self,
        project: &ProjectRef,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RawBuild>, FetchError>;
}

/// CircleCI REST API v1.1 client.
pub struct CircleClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl CircleClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            token: config.token.clone(),
        })
    }

    /// `{base}/project/github/{user}/{project}/tree/{branch}?limit=..&offset=..`
    pub fn builds_url(
        &self,
        project: &ProjectRef,
        limit: usize,
        offset: usize,
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| FetchError::Url(format!("{}: {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|()| FetchError::Url(format!("{} cannot be a base url", self.api_base)))?
            .pop_if_empty()
            .extend([
                "project",
                VCS_TYPE,
                project.user.as_str(),
                project.project_name.as_str(),
                "tree",
                project.branch.as_str(),
            ]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }
}

#[async_trait]
impl BuildSource for CircleClient {
    async fn recent_builds(
        &self,
        project: &ProjectRef,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RawBuild>, FetchError> {
        let url = self.builds_url(project, limit, offset)?;
        let start = std::time::Instant::now();

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header("Circle-Token", &self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.trim().chars().take(200).collect(),
            });
        }

        let builds = parser::parse_builds(&body)?;
        tracing::debug!(
            project = %project,
            builds = builds.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "fetched recent builds"
        );
        Ok(builds)
    }
}
