//! CLI argument parsing for the lookup.
//!
//! Every input doubles as an environment variable so the binary runs unchanged
//! as a GitHub Actions step (`INPUT_*` for action inputs, `GITHUB_*` for the
//! runner context) or from a shell with explicit flags.
use clap::Parser;
use std::path::PathBuf;

/// Public GitHub REST endpoint; GitHub Enterprise Server runners override it.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page the workflow runs endpoint will return.
pub const MAX_PER_PAGE: u16 = 100;

/// Raw inputs. Required values stay optional here so a missing input is
/// reported through the failure sink instead of a usage error.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "last-green",
    version,
    about = "Print the head commit of the last successful run of a workflow",
    after_help = "Examples:\n  \
        last-green --workflow CI --branch main --repository octo/app --sha $(git rev-parse HEAD)\n  \
        last-green --workflow CI --verify --output-file \"$GITHUB_OUTPUT\""
)]
pub struct ActionArgs {
    /// Display name of the workflow to search
    #[arg(long, env = "INPUT_WORKFLOW", value_name = "NAME")]
    pub workflow: Option<String>,

    /// Only consider runs on this branch (empty means any branch)
    #[arg(long, env = "INPUT_BRANCH", value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Require the chosen commit to exist in the local checkout
    #[arg(
        long,
        env = "INPUT_VERIFY",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub verify: Option<String>,

    /// Token for the GitHub API
    #[arg(long, env = "INPUT_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository to query, as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// Commit that triggered this invocation; never chosen as its own baseline
    #[arg(long, env = "GITHUB_SHA", value_name = "SHA")]
    pub sha: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Number of workflow runs to fetch (single page, capped at 100)
    #[arg(long, value_name = "N", default_value_t = MAX_PER_PAGE)]
    pub per_page: u16,

    /// HTTP timeout for each API request
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Checkout to verify commits against (defaults to the working directory)
    #[arg(long, env = "GITHUB_WORKSPACE", value_name = "DIR")]
    pub checkout_dir: Option<PathBuf>,

    /// File that receives `sha=<value>` (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Emit debug-level diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,
}
