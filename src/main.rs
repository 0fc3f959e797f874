use clap::Parser;
use last_green::action::{run_action, Outcome};
use last_green::cli::ActionArgs;
use last_green::config::ActionConfig;
use last_green::github::GithubClient;
use last_green::history::GitRevList;
use last_green::oracle::CommitOracle;
use last_green::report::{ActionsReporter, Reporter};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = ActionArgs::parse();
    init_tracing(args.verbose);

    let mut reporter = ActionsReporter::stdout(args.output_file.clone());
    let config = match ActionConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            reporter.fail(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    let client = GithubClient::new(&config.platform);
    let mut oracle = CommitOracle::new(GitRevList::new(config.checkout_dir.clone()));
    match run_action(&config, &client, &mut oracle, &mut reporter) {
        Outcome::Selected { .. } => ExitCode::SUCCESS,
        Outcome::Failed(_) => ExitCode::FAILURE,
    }
}

/// Diagnostics go to stderr; stdout carries workflow commands only.
/// `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
