//! Validated configuration for one lookup.
use crate::cli::{ActionArgs, MAX_PER_PAGE};
use crate::error::ConfigError;
use crate::selector::SelectionCriteria;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepository(raw.to_string());
        let (owner, name) = raw.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Connection settings for the platform client.
#[derive(Clone)]
pub struct PlatformSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

// Hand-written so the token can never reach a log line.
impl fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub repository: Repository,
    pub workflow: String,
    pub criteria: SelectionCriteria,
    pub per_page: u16,
    pub platform: PlatformSettings,
    pub checkout_dir: Option<PathBuf>,
}

impl ActionConfig {
    pub fn from_args(args: &ActionArgs) -> Result<Self, ConfigError> {
        let workflow =
            non_empty(args.workflow.as_deref()).ok_or(ConfigError::MissingInput("workflow"))?;
        let repository: Repository = non_empty(args.repository.as_deref())
            .ok_or(ConfigError::MissingInput("repository"))?
            .parse()?;
        let triggering_sha =
            non_empty(args.sha.as_deref()).ok_or(ConfigError::MissingInput("sha"))?;
        let require_verification = parse_bool_input("verify", args.verify.as_deref())?;

        Ok(Self {
            repository,
            workflow: workflow.to_string(),
            criteria: SelectionCriteria {
                target_branch: non_empty(args.branch.as_deref()).map(str::to_string),
                require_verification,
                triggering_sha: triggering_sha.to_string(),
            },
            per_page: args.per_page.clamp(1, MAX_PER_PAGE),
            platform: PlatformSettings {
                api_url: args.api_url.trim_end_matches('/').to_string(),
                token: non_empty(args.token.as_deref()).map(str::to_string),
                timeout: Duration::from_secs(args.timeout_secs),
            },
            checkout_dir: args.checkout_dir.clone(),
        })
    }
}

/// Parse a boolean input the way Actions does: the YAML 1.2 core schema
/// spellings only, with an absent or empty input meaning false.
pub fn parse_bool_input(name: &'static str, raw: Option<&str>) -> Result<bool, ConfigError> {
    let Some(value) = non_empty(raw) else {
        return Ok(false);
    };
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            name,
            value: value.to_string(),
        }),
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
