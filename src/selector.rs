//! Candidate filtering and baseline selection.
//!
//! Filtering keeps successful runs on the wanted branch, newest first.
//! Selection walks that sequence and takes the first run that is not the
//! triggering commit and, when verification is on, exists locally. The walk
//! stops at the first acceptance so the oracle is consulted as little as
//! possible.
use crate::github::{Conclusion, WorkflowRun};
use crate::oracle::CommitMembership;
use std::cmp::Reverse;

/// Selection rules for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// `None` accepts runs from any branch.
    pub target_branch: Option<String>,
    pub require_verification: bool,
    /// Commit of the current invocation; never its own baseline.
    pub triggering_sha: String,
}

impl SelectionCriteria {
    pub fn branch_matches(&self, run: &WorkflowRun) -> bool {
        match &self.target_branch {
            None => true,
            Some(branch) => run.head_branch.as_deref() == Some(branch.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Found { sha: String, run_url: String },
    NoneFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accepted,
    TriggeringCommit,
    BranchMismatch,
    NotInCheckout,
}

impl Verdict {
    fn as_str(self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::TriggeringCommit => "skipped: triggering commit",
            Verdict::BranchMismatch => "skipped: branch mismatch",
            Verdict::NotInCheckout => "skipped: commit not in local history",
        }
    }
}

/// Successful runs on the target branch, most recent first.
///
/// The sort is stable, so runs sharing a timestamp keep their fetch order.
pub fn filter_runs(runs: Vec<WorkflowRun>, criteria: &SelectionCriteria) -> Vec<WorkflowRun> {
    let mut candidates: Vec<WorkflowRun> = runs
        .into_iter()
        .filter(|run| run.conclusion == Some(Conclusion::Success))
        .filter(|run| criteria.branch_matches(run))
        .collect();
    candidates.sort_by_key(|run| Reverse(run.created_at));
    candidates
}

/// Pick the first acceptable candidate.
///
/// `membership` is only queried when `criteria.require_verification` is set.
pub fn select_run<I, M>(
    candidates: I,
    criteria: &SelectionCriteria,
    membership: &mut M,
) -> Selection
where
    I: IntoIterator<Item = WorkflowRun>,
    M: CommitMembership + ?Sized,
{
    for run in candidates {
        let verdict = judge(&run, criteria, membership);
        tracing::info!(
            sha = %run.head_sha,
            branch = run.head_branch.as_deref().unwrap_or("<none>"),
            created_at = %run.created_at,
            url = %run.html_url,
            decision = verdict.as_str(),
            "considered run"
        );
        if verdict == Verdict::Accepted {
            return Selection::Found {
                sha: run.head_sha,
                run_url: run.html_url,
            };
        }
    }
    Selection::NoneFound
}

fn judge<M>(run: &WorkflowRun, criteria: &SelectionCriteria, membership: &mut M) -> Verdict
where
    M: CommitMembership + ?Sized,
{
    if run.head_sha == criteria.triggering_sha {
        return Verdict::TriggeringCommit;
    }
    if !criteria.branch_matches(run) {
        return Verdict::BranchMismatch;
    }
    if criteria.require_verification && !membership.contains(&run.head_sha) {
        return Verdict::NotInCheckout;
    }
    Verdict::Accepted
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
