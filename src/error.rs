//! Error taxonomy for a single lookup.
//!
//! Only [`ActionError`] ends an invocation. [`ProcessError`] is absorbed by the
//! commit oracle, which degrades to "nothing verifiable" instead.
use thiserror::Error;

/// The hosting API was unreachable or rejected a request.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Local history enumeration failed.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{program} not found on PATH: {source}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed: {detail}")]
    Failed { program: String, detail: String },

    #[error("{program} produced non-UTF-8 output")]
    InvalidOutput { program: String },
}

/// Invalid or missing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("invalid repository {0:?}: expected owner/repo")]
    InvalidRepository(String),

    #[error(
        "invalid boolean for input {name}: {value:?} \
         (expected true | True | TRUE | false | False | FALSE)"
    )]
    InvalidBoolean { name: &'static str, value: String },
}

/// Conditions that make the lookup unachievable; reported as a hard failure.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("No workflow exists with the name \"{name}\"")]
    WorkflowNotFound { name: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("set output: {0:#}")]
    Output(anyhow::Error),
}
