//! Find the head commit of the most recent successful run of a GitHub
//! Actions workflow, excluding the commit that triggered the current run.
//!
//! The result is a stable baseline for incremental diffing: the last commit
//! CI was green on, optionally confirmed to exist in the local checkout.
pub mod action;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod history;
pub mod oracle;
pub mod report;
pub mod resolver;
pub mod selector;
mod util;
