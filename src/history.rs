//! Local commit enumeration.
use crate::error::ProcessError;
use crate::util::first_line;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

/// Produces every commit id reachable in the local checkout.
///
/// Implementations must return the complete list or an error; partial output
/// is never surfaced.
pub trait CommitSource {
    fn enumerate(&self) -> Result<Vec<String>, ProcessError>;
}

/// `git rev-list --all` in a checkout.
#[derive(Debug, Clone, Default)]
pub struct GitRevList {
    checkout_dir: Option<PathBuf>,
}

impl GitRevList {
    pub fn new(checkout_dir: Option<PathBuf>) -> Self {
        Self { checkout_dir }
    }
}

impl CommitSource for GitRevList {
    fn enumerate(&self) -> Result<Vec<String>, ProcessError> {
        let git = which::which("git").map_err(|source| ProcessError::NotFound {
            program: "git".to_string(),
            source,
        })?;

        let start = Instant::now();
        let mut command = Command::new(&git);
        command.args(["rev-list", "--all"]);
        if let Some(dir) = &self.checkout_dir {
            command.current_dir(dir);
        }
        let output = command.output().map_err(|source| ProcessError::Spawn {
            program: git.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let line = first_line(&stderr);
            let detail = if line.is_empty() {
                format!("status {}", output.status)
            } else {
                line.to_string()
            };
            return Err(ProcessError::Failed {
                program: "git rev-list".to_string(),
                detail,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| ProcessError::InvalidOutput {
            program: "git rev-list".to_string(),
        })?;
        let commits: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis(),
            commits = commits.len(),
            "git rev-list complete"
        );
        Ok(commits)
    }
}
