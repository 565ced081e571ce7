use crate::config::FetchPolicy;
use clap::Parser;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

pub const DEFAULT_API_URL: &str = "https://circleci.com/api/v1.1";

#[derive(Parser, Debug)]
#[command(
    name = "ccw",
    version = VERSION,
    about = "A terminal view of the recent CircleCI builds for the current branch"
)]
pub struct Cli {
    /// CircleCI API token
    #[arg(long, env = "CIRCLECI_TOKEN", hide_env_values = true)]
    pub circle_token: Option<String>,

    /// Refresh interval, e.g. 30s, 1m30s, 2m
    #[arg(long, default_value = "30s")]
    pub update_interval: String,

    /// What to do when fetching builds fails
    #[arg(long, value_enum, default_value_t = FetchPolicy::Degrade)]
    pub fetch_errors: FetchPolicy,

    /// CircleCI API base url
    #[arg(long, default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    /// Write debug logs to $XDG_STATE_HOME/ccw/debug.log
    #[arg(short, long)]
    pub verbose: bool,
}
