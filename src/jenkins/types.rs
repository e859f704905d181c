use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level listing returned by `GET /api/json`.
#[derive(Debug, Deserialize)]
pub(crate) struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

/// A job as it appears in the server's job listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Job details from `GET /job/{name}/api/json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub in_queue: bool,
    /// Number the next triggered build will receive
    #[serde(default)]
    pub next_build_number: i64,
    #[serde(default)]
    pub builds: Vec<BuildRef>,
}

/// Reference to a build inside a job's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRef {
    pub number: i64,
    #[serde(default)]
    pub url: String,
}

/// Final outcome of a build. `None` on [`BuildDetails`] while it is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
            BuildResult::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Build details from `GET /job/{name}/{number}/api/json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDetails {
    pub number: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<BuildResult>,
    /// Start time in milliseconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
    /// Duration in milliseconds, zero while running
    #[serde(default)]
    pub duration: i64,
}

impl BuildDetails {
    pub fn is_success(&self) -> bool {
        self.result == Some(BuildResult::Success)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration as f64 / 1000.0
    }
}

/// CSRF token from `GET /crumbIssuer/api/json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Crumb {
    pub crumb: String,
    pub crumb_request_field: String,
}
