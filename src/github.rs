//! GitHub Actions REST client.
//!
//! Only two read endpoints are used: the repository's workflow list and one
//! page of runs for a single workflow. Both are plain blocking GETs; there is
//! no pagination or retry.
use crate::config::{PlatformSettings, Repository};
use crate::error::PlatformError;
use crate::util::truncate_string;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("last-green/", env!("CARGO_PKG_VERSION"));

/// Cap on response bytes echoed at trace level.
const MAX_LOGGED_BODY_BYTES: usize = 8 * 1024;

/// Page size for the workflow list; repositories rarely define more.
const WORKFLOWS_PER_PAGE: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub state: String,
}

/// Terminal outcome of a run. Unknown values map to `Other` so new platform
/// states never break decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Neutral,
    Stale,
    StartupFailure,
    Other,
}

impl From<String> for Conclusion {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            "timed_out" => Self::TimedOut,
            "action_required" => Self::ActionRequired,
            "neutral" => Self::Neutral,
            "stale" => Self::Stale,
            "startup_failure" => Self::StartupFailure,
            _ => Self::Other,
        }
    }
}

/// One historical execution of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub head_sha: String,
    /// Absent for runs not tied to a branch (e.g. some tag pushes).
    #[serde(default)]
    pub head_branch: Option<String>,
    /// `None` while the run is still in progress.
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct WorkflowList {
    #[serde(default)]
    total_count: u64,
    workflows: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunList {
    #[serde(default)]
    total_count: u64,
    workflow_runs: Vec<WorkflowRun>,
}

/// The hosting platform, as seen by the lookup.
pub trait Platform {
    fn list_workflows(&self, repo: &Repository) -> Result<Vec<Workflow>, PlatformError>;

    /// A single page of runs, newest first as the platform returns them.
    fn list_workflow_runs(
        &self,
        repo: &Repository,
        workflow_id: u64,
        per_page: u16,
    ) -> Result<Vec<WorkflowRun>, PlatformError>;
}

pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(settings: &PlatformSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .build();
        Self {
            agent: config.into(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, per_page: u16) -> Result<T, PlatformError> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .agent
            .get(&url)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .query("per_page", per_page.to_string());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let start = Instant::now();
        let mut response = request.call().map_err(|err| request_error(&url, err))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| request_error(&url, err))?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis(),
            url = %url,
            response_bytes = body.len(),
            "github request complete"
        );
        tracing::trace!(
            url = %url,
            body = %truncate_string(&body, MAX_LOGGED_BODY_BYTES),
            "github response body"
        );

        serde_json::from_str(&body).map_err(|source| PlatformError::Decode { url, source })
    }
}

impl Platform for GithubClient {
    fn list_workflows(&self, repo: &Repository) -> Result<Vec<Workflow>, PlatformError> {
        let path = format!("/repos/{}/{}/actions/workflows", repo.owner, repo.name);
        let list: WorkflowList = self.get_json(&path, WORKFLOWS_PER_PAGE)?;
        tracing::debug!(
            total_count = list.total_count,
            returned = list.workflows.len(),
            "listed workflows"
        );
        Ok(list.workflows)
    }

    fn list_workflow_runs(
        &self,
        repo: &Repository,
        workflow_id: u64,
        per_page: u16,
    ) -> Result<Vec<WorkflowRun>, PlatformError> {
        let path = format!(
            "/repos/{}/{}/actions/workflows/{workflow_id}/runs",
            repo.owner, repo.name
        );
        let list: WorkflowRunList = self.get_json(&path, per_page)?;
        tracing::debug!(
            workflow_id,
            total_count = list.total_count,
            returned = list.workflow_runs.len(),
            "listed workflow runs"
        );
        Ok(list.workflow_runs)
    }
}

fn request_error(url: &str, err: ureq::Error) -> PlatformError {
    match err {
        ureq::Error::StatusCode(status) => PlatformError::Status {
            url: url.to_string(),
            status,
        },
        other => PlatformError::Transport {
            url: url.to_string(),
            message: other.to_string(),
        },
    }
}
