//! Error taxonomy.
//!
//! Startup errors ([`ConfigError`], [`ResolutionError`], [`PresentationInitError`])
//! are fatal and end the process before the refresh loop starts. [`FetchError`] is
//! per-cycle and handled according to the configured [`crate::config::FetchPolicy`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("a circleci token is required (--circle-token or CIRCLECI_TOKEN)")]
    MissingToken,

    #[error("parsing {input:?} as duration failed: {reason}")]
    InvalidInterval { input: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("git not found in PATH")]
    GitNotFound,

    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git {0} timed out after {1}s")]
    Timeout(String, u64),

    #[error("could not find org/repo in remote url {0:?}")]
    UnrecognizedRemote(String),

    #[error("could not determine the current branch")]
    EmptyBranch,
}

#[derive(Error, Debug)]
#[error("initializing terminal failed: {0}")]
pub struct PresentationInitError(#[from] pub std::io::Error);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid request url: {0}")]
    Url(String),

    #[error("CircleCI request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CircleCI returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CircleCI response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a refresh cycle produced no frame.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("rendering failed: {0}")]
    Render(#[from] std::io::Error),
}
