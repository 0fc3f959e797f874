//! Reporting and result sinks.
//!
//! Messages meant for the workflow log go to stdout as GitHub Actions
//! workflow commands; diagnostics go through `tracing` on stderr. The single
//! result value is appended to the `GITHUB_OUTPUT` file when one is configured.
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

pub trait Reporter {
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn fail(&mut self, message: &str);
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

pub struct ActionsReporter<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
    failed: bool,
}

impl ActionsReporter<io::Stdout> {
    pub fn stdout(output_file: Option<PathBuf>) -> Self {
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> ActionsReporter<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self {
            out,
            output_file,
            failed: false,
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Log writes are best effort; a closed stdout must not turn a found
    // baseline into a failure.
    fn line(&mut self, line: &str) {
        writeln!(self.out, "{line}").ok();
    }
}

impl<W: Write> Reporter for ActionsReporter<W> {
    fn info(&mut self, message: &str) {
        self.line(message);
    }

    fn warn(&mut self, message: &str) {
        let line = format!("::warning::{}", escape_data(message));
        self.line(&line);
    }

    fn fail(&mut self, message: &str) {
        self.failed = true;
        let line = format!("::error::{}", escape_data(message));
        self.line(&line);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        if name.contains(['=', '\n', '\r']) || value.contains(['\n', '\r']) {
            return Err(anyhow!("output {name:?} must be a single line"));
        }
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("open output file {}", path.display()))?;
                writeln!(file, "{name}={value}")
                    .with_context(|| format!("write output file {}", path.display()))?;
            }
            None => {
                writeln!(self.out, "{name}={value}").context("write output to stdout")?;
            }
        }
        tracing::debug!(name, value, "output set");
        Ok(())
    }
}

/// Escape a workflow command message.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
