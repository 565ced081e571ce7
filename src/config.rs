//! Immutable runtime configuration, built once from the command line.

use crate::cli::Cli;
use crate::error::ConfigError;
use std::time::Duration;

/// How a failed build fetch is reported to the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FetchPolicy {
    /// Log the failure and render an empty table.
    #[default]
    Degrade,
    /// Hand the failure to the coordinator; the previous table stays on screen.
    Propagate,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub update_interval: Duration,
    pub fetch_policy: FetchPolicy,
    pub api_base: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let token = cli
            .circle_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?
            .to_string();
        let update_interval = parse_interval(&cli.update_interval)?;

        Ok(Self {
            token,
            update_interval,
            fetch_policy: cli.fetch_errors,
            api_base: cli.api_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Parses a duration such as `30s`, `1m30s`, `1.5h` or `250ms`.
///
/// Accepts a sequence of `<number><unit>` pairs with units `ns`, `us`/`µs`,
/// `ms`, `s`, `m` and `h`. The result must be strictly positive.
pub fn parse_interval(input: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidInterval {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total_secs = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(num_end);
        if !number.chars().any(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a number"));
        }
        let value: f64 = number.parse().map_err(|_| invalid("malformed number"))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" | "μs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid(&format!("unknown unit {unit:?}"))),
        };

        total_secs += value * scale;
        rest = next;
    }

    let duration =
        Duration::try_from_secs_f64(total_secs).map_err(|_| invalid("duration out of range"))?;
    if duration.is_zero() {
        return Err(invalid("interval must be greater than zero"));
    }
    Ok(duration)
}
