//! Resolves which CircleCI project and branch to watch from the local git checkout.

use crate::error::ResolutionError;
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;

const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// `host.tld` followed by `:` (ssh) or `/` (https), then `org/repo`.
static REMOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9]*\.[a-zA-Z0-9]*(?::|/)(?P<org>[a-zA-Z0-9_-]*)/(?P<repo>[a-zA-Z0-9_-]*)")
        .expect("remote url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub user: String,
    pub project_name: String,
    pub branch: String,
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/tree/{}", self.user, self.project_name, self.branch)
    }
}

/// Read-only access to the repository metadata the resolver needs.
#[async_trait]
pub trait GitSource: Send + Sync {
    async fn remote_url(&self) -> Result<String, ResolutionError>;
    async fn current_branch(&self) -> Result<String, ResolutionError>;
}

/// Shells out to `git` in the current working directory.
pub struct GitCli;

#[async_trait]
impl GitSource for GitCli {
    async fn remote_url(&self) -> Result<String, ResolutionError> {
        run_git(&["config", "--get", "remote.origin.url"]).await
    }

    async fn current_branch(&self) -> Result<String, ResolutionError> {
        run_git(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }
}

async fn run_git(args: &[&str]) -> Result<String, ResolutionError> {
    let command = args.join(" ");
    let output = tokio::time::timeout(GIT_TIMEOUT, Command::new("git").args(args).output())
        .await
        .map_err(|_| ResolutionError::Timeout(command.clone(), GIT_TIMEOUT.as_secs()))?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolutionError::GitNotFound
            } else {
                ResolutionError::Spawn(e)
            }
        })?;

    if !output.status.success() {
        return Err(ResolutionError::CommandFailed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::debug!(%command, "git command completed");
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Extracts `(org, repo)` from an ssh or https remote url.
pub fn parse_remote(url: &str) -> Option<(String, String)> {
    let caps = REMOTE_REGEX.captures(url.trim())?;
    let org = caps.name("org")?.as_str();
    let repo = caps.name("repo")?.as_str();
    if org.is_empty() || repo.is_empty() {
        return None;
    }
    Some((org.to_string(), repo.to_string()))
}

/// Looks up remote and branch and combines them into a [`ProjectRef`].
///
/// Either every field is resolved and non-empty, or an error is returned.
pub async fn resolve(source: &dyn GitSource) -> Result<ProjectRef, ResolutionError> {
    let remote = source.remote_url().await?;
    let branch = source.current_branch().await?;

    let remote = remote.trim();
    let branch = branch.trim();

    let (user, project_name) =
        parse_remote(remote).ok_or_else(|| ResolutionError::UnrecognizedRemote(remote.to_string()))?;
    if branch.is_empty() {
        return Err(ResolutionError::EmptyBranch);
    }

    Ok(ProjectRef {
        user,
        project_name,
        branch: branch.to_string(),
    })
}
