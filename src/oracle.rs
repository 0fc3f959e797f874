//! Commit membership oracle.
//!
//! Wraps a [`CommitSource`] in a set that is built on the first query and
//! reused for the rest of the process. The lifecycle is one-way:
//!
//! ```text
//! Uninitialized --first contains()--> Ready(commits)
//!                                 \-> Ready(empty, degraded)   on ProcessError
//! ```
//!
//! A degraded oracle answers `false` for everything; enumeration is never
//! retried.
use crate::history::CommitSource;
use std::collections::HashSet;

/// Answers whether a commit is present locally.
pub trait CommitMembership {
    fn contains(&mut self, sha: &str) -> bool;
}

/// Commits reachable in the checkout, as enumerated once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSet {
    commits: HashSet<String>,
    degraded: bool,
}

impl CommitSet {
    pub fn contains(&self, sha: &str) -> bool {
        self.commits.contains(sha)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// True when enumeration failed and the set stands in as empty.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleState<'a> {
    Uninitialized,
    Ready(&'a CommitSet),
}

pub struct CommitOracle<S> {
    source: S,
    ready: Option<CommitSet>,
}

impl<S: CommitSource> CommitOracle<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ready: None,
        }
    }

    pub fn state(&self) -> OracleState<'_> {
        match &self.ready {
            None => OracleState::Uninitialized,
            Some(set) => OracleState::Ready(set),
        }
    }

    fn commits(&mut self) -> &CommitSet {
        self.ready.get_or_insert_with(|| populate(&self.source))
    }
}

impl<S: CommitSource> CommitMembership for CommitOracle<S> {
    fn contains(&mut self, sha: &str) -> bool {
        self.commits().contains(sha)
    }
}

fn populate<S: CommitSource>(source: &S) -> CommitSet {
    match source.enumerate() {
        Ok(commits) => {
            let commits: HashSet<String> = commits.into_iter().collect();
            tracing::info!(commits = commits.len(), "enumerated local commits");
            CommitSet {
                commits,
                degraded: false,
            }
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "unable to enumerate local commits; no candidate can be verified"
            );
            CommitSet {
                commits: HashSet::new(),
                degraded: true,
            }
        }
    }
}
