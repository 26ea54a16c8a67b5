//! Runner configuration
//!
//! Priority order (highest to lowest):
//! 1. Explicit values set by the caller (CLI flags)
//! 2. Environment variables (optionally loaded from `.env` files)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FlowError, Result};

/// Path (or bare name) of the flow CLI
pub const CLI_PATH_ENV: &str = "NAJIE_FLOW_CLI";
/// Data directory shared with the flow CLI
pub const DATA_DIR_ENV: &str = "NAJIE_USER_DATA_PATH";
/// Default invocation timeout in seconds
pub const TIMEOUT_ENV: &str = "FLOWRUN_TIMEOUT_SECS";
/// Per-stream capture cap in bytes
pub const OUTPUT_LIMIT_ENV: &str = "FLOWRUN_OUTPUT_LIMIT";
/// Serialize concurrent runs of the same flow ("1"/"true")
pub const SERIALIZE_RUNS_ENV: &str = "FLOWRUN_SERIALIZE_RUNS";

/// Executable looked up on PATH when nothing is configured
pub const DEFAULT_CLI_NAME: &str = "najie-flow";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_OUTPUT_LIMIT: usize = 8 * 1024 * 1024;

/// Configuration for [`crate::ProcessRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Flow CLI path or bare name (resolved via PATH)
    pub cli_path: String,
    /// Forwarded as `--data-dir <dir>` and `NAJIE_USER_DATA_PATH`
    pub data_dir: Option<PathBuf>,
    /// Default working directory for children (None = inherit)
    pub working_dir: Option<PathBuf>,
    /// Timeout applied when a request does not set its own
    pub default_timeout: Duration,
    /// Max bytes kept per output stream
    pub output_limit: usize,
    /// Hold a per-flow lock for the duration of keyed invocations
    pub serialize_runs: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cli_path: DEFAULT_CLI_NAME.to_string(),
            data_dir: None,
            working_dir: None,
            default_timeout: DEFAULT_TIMEOUT,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            serialize_runs: false,
        }
    }
}

impl RunnerConfig {
    /// Build a config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup (testable)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(CLI_PATH_ENV) {
            config.cli_path = path;
        }
        if let Some(dir) = non_empty(DATA_DIR_ENV) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = non_empty(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                FlowError::config(format!("{TIMEOUT_ENV} must be a number of seconds, got '{raw}'"))
            })?;
            if secs == 0 {
                return Err(FlowError::config(format!("{TIMEOUT_ENV} must be greater than zero")));
            }
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = non_empty(OUTPUT_LIMIT_ENV) {
            config.output_limit = raw.trim().parse().map_err(|_| {
                FlowError::config(format!("{OUTPUT_LIMIT_ENV} must be a byte count, got '{raw}'"))
            })?;
        }
        if let Some(raw) = non_empty(SERIALIZE_RUNS_ENV) {
            config.serialize_runs = parse_flag(&raw).ok_or_else(|| {
                FlowError::config(format!("{SERIALIZE_RUNS_ENV} must be a boolean, got '{raw}'"))
            })?;
        }

        Ok(config)
    }

    pub fn with_cli_path(mut self, cli_path: impl Into<String>) -> Self {
        self.cli_path = cli_path.into();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output_limit = limit;
        self
    }

    pub fn with_serialize_runs(mut self, enabled: bool) -> Self {
        self.serialize_runs = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load environment variables from .env files
///
/// Checks the current directory first, then `~/.flowrun/.env`.
/// dotenvy never overwrites variables that are already set.
///
/// Runs before logging is set up (clap's env fallbacks need the values), so
/// the files that were loaded are returned for the caller to report.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// The flowrun config directory path (~/.flowrun)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".flowrun"))
}
