//! One lookup, end to end.
//!
//! Resolve the workflow, fetch a page of its runs, select a baseline, and
//! report exactly one of: the `sha` output, or a failure. When no run
//! qualifies the triggering commit is substituted with a warning, so only
//! hard errors (unknown workflow, platform failure) leave no output.
use crate::config::ActionConfig;
use crate::error::ActionError;
use crate::github::Platform;
use crate::oracle::CommitMembership;
use crate::report::Reporter;
use crate::resolver::resolve_workflow;
use crate::selector::{filter_runs, select_run, Selection};

/// Name of the single result value.
pub const OUTPUT_SHA: &str = "sha";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineSource {
    /// Head commit of a qualifying run.
    Run { url: String },
    /// No run qualified; the triggering commit stands in.
    Fallback,
}

#[derive(Debug)]
pub enum Outcome {
    Selected { sha: String, source: BaselineSource },
    Failed(ActionError),
}

pub fn run_action<P, M, R>(
    config: &ActionConfig,
    platform: &P,
    membership: &mut M,
    reporter: &mut R,
) -> Outcome
where
    P: Platform + ?Sized,
    M: CommitMembership + ?Sized,
    R: Reporter + ?Sized,
{
    let result = find_baseline(config, platform, membership, reporter).and_then(|(sha, source)| {
        reporter
            .set_output(OUTPUT_SHA, &sha)
            .map_err(ActionError::Output)?;
        Ok((sha, source))
    });
    match result {
        Ok((sha, source)) => Outcome::Selected { sha, source },
        Err(err) => {
            tracing::error!(error = %err, "lookup failed");
            reporter.fail(&err.to_string());
            Outcome::Failed(err)
        }
    }
}

fn find_baseline<P, M, R>(
    config: &ActionConfig,
    platform: &P,
    membership: &mut M,
    reporter: &mut R,
) -> Result<(String, BaselineSource), ActionError>
where
    P: Platform + ?Sized,
    M: CommitMembership + ?Sized,
    R: Reporter + ?Sized,
{
    let criteria = &config.criteria;
    let branch = criteria.target_branch.as_deref().unwrap_or("");
    tracing::info!(
        owner = %config.repository.owner,
        repo = %config.repository.name,
        branch,
        workflow = %config.workflow,
        verify = criteria.require_verification,
        "looking up last successful run"
    );

    let workflows = platform.list_workflows(&config.repository)?;
    let workflow = resolve_workflow(&config.workflow, &workflows)?;
    reporter.info(&format!(
        "Discovered workflowId for search: {}",
        workflow.id
    ));

    let runs = platform.list_workflow_runs(&config.repository, workflow.id, config.per_page)?;
    let fetched = runs.len();
    let candidates = filter_runs(runs, criteria);
    tracing::debug!(fetched, candidates = candidates.len(), "filtered runs");
    reporter.info(&format!("Found {} successful runs", candidates.len()));
    if candidates.is_empty() {
        reporter.info(&format!("No previous runs found for branch {branch}."));
    }

    match select_run(candidates, criteria, membership) {
        Selection::Found { sha, run_url } => {
            let message = if criteria.require_verification {
                format!("Commit {sha} from run {run_url} verified as last successful CI run.")
            } else {
                format!("Using {sha} from run {run_url} as last successful CI run.")
            };
            reporter.info(&message);
            Ok((sha, BaselineSource::Run { url: run_url }))
        }
        Selection::NoneFound => {
            reporter.warn(
                "Unable to determine SHA of last successful commit. Using SHA for current commit.",
            );
            Ok((criteria.triggering_sha.clone(), BaselineSource::Fallback))
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
