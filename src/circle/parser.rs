use chrono::{DateTime, Utc};

/// One entry of CircleCI's "recent builds for a project branch" listing.
///
/// Only the fields the dashboard shows are kept; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RawBuild {
    pub build_num: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub workflows: Option<WorkflowInfo>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub build_url: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WorkflowInfo {
    #[serde(default)]
    pub job_name: String,
}

pub fn parse_builds(json: &str) -> Result<Vec<RawBuild>, serde_json::Error> {
    serde_json::from_str(json)
}
