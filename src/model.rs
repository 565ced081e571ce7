//! Turns raw CircleCI builds into the table the dashboard draws.

use crate::circle::RawBuild;
use crate::project::ProjectRef;
use chrono::{DateTime, Utc};

pub const HEADER: [&str; 5] = ["build_num", "job", "state", "duration", "url"];

const DEFAULT_JOB_NAME: &str = "build";
const NO_DURATION: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    Neutral,
    Success,
    Failure,
}

impl ColorClass {
    pub fn from_status(status: &str) -> Self {
        match status {
            "failed" => ColorClass::Failure,
            "fixed" | "success" => ColorClass::Success,
            _ => ColorClass::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRow {
    pub build_num: String,
    pub job_name: String,
    pub status: String,
    pub duration: String,
    pub url: String,
    pub color: ColorClass,
}

impl BuildRow {
    /// Cells in [`HEADER`] order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.build_num.as_str(),
            self.job_name.as_str(),
            self.status.as_str(),
            self.duration.as_str(),
            self.url.as_str(),
        ]
    }
}

/// Snapshot handed to the presenter. A fresh one is built every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub title: String,
    pub header: [&'static str; 5],
    pub rows: Vec<BuildRow>,
    pub generated_at: DateTime<Utc>,
}

pub fn build(project: &ProjectRef, raws: &[RawBuild]) -> DisplayModel {
    build_at(project, raws, Utc::now())
}

/// Same as [`build`] with an explicit clock, used for in-progress durations.
pub fn build_at(project: &ProjectRef, raws: &[RawBuild], now: DateTime<Utc>) -> DisplayModel {
    DisplayModel {
        title: format!("builds for {project}"),
        header: HEADER,
        rows: raws.iter().map(|raw| build_row(raw, now)).collect(),
        generated_at: now,
    }
}

fn build_row(raw: &RawBuild, now: DateTime<Utc>) -> BuildRow {
    let color = ColorClass::from_status(&raw.status);
    BuildRow {
        build_num: raw.build_num.to_string(),
        job_name: job_name(raw).to_string(),
        status: raw.status.clone(),
        duration: duration(raw, now),
        url: raw.build_url.clone(),
        color,
    }
}

fn job_name(raw: &RawBuild) -> &str {
    if let Some(name) = &raw.job_name {
        return name;
    }
    match &raw.workflows {
        Some(wf) if !wf.job_name.is_empty() => &wf.job_name,
        _ => DEFAULT_JOB_NAME,
    }
}

fn duration(raw: &RawBuild, now: DateTime<Utc>) -> String {
    match (raw.start_time, raw.stop_time) {
        (Some(start), Some(stop)) => format_duration((stop - start).num_seconds()),
        (Some(start), None) => format_duration((now - start).num_seconds()),
        (None, _) => NO_DURATION.to_string(),
    }
}

pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
