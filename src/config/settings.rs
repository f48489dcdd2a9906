//! Effective settings for one run.
//!
//! Precedence: command line > config file > built-in default.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::schema::{FileConfig, LogLevel};
use crate::error::{DepguessError, Result};
use crate::resolver::TimeoutPolicy;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default virtual environment directory name.
pub const DEFAULT_ENV_NAME: &str = "env";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timeout: Option<u64>,
    pub yes: Option<bool>,
    pub create_env: Option<bool>,
    pub env_name: Option<String>,
    pub python: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub timeout_policy: Option<TimeoutPolicy>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub script: PathBuf,
    pub timeout: Duration,
    pub auto_confirm: bool,
    pub create_env: bool,
    pub env_name: String,
    pub python: Option<PathBuf>,
    /// `None` leaves the choice to `RUST_LOG`.
    pub log_level: Option<LogLevel>,
    pub timeout_policy: TimeoutPolicy,
}

impl Settings {
    /// Merge overrides over the file config over defaults, then validate.
    pub fn resolve(script: PathBuf, overrides: Overrides, file: FileConfig) -> Result<Self> {
        let timeout_secs = overrides
            .timeout
            .or(file.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(DepguessError::ConfigValidationError {
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        let env_name = overrides
            .env_name
            .or(file.env_name)
            .unwrap_or_else(|| DEFAULT_ENV_NAME.to_string());
        if env_name.trim().is_empty() {
            return Err(DepguessError::ConfigValidationError {
                message: "env_name must not be empty".to_string(),
            });
        }

        Ok(Self {
            script,
            timeout: Duration::from_secs(timeout_secs),
            auto_confirm: overrides.yes.or(file.yes).unwrap_or(false),
            create_env: overrides.create_env.or(file.create_env).unwrap_or(false),
            env_name,
            python: overrides.python.or(file.python),
            log_level: overrides.log_level.or(file.log_level),
            timeout_policy: overrides
                .timeout_policy
                .or(file.timeout_policy)
                .unwrap_or_default(),
        })
    }
}
