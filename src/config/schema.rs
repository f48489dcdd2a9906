//! Configuration file format.
//!
//! Maps `.depguess.yml`. Every key is optional; anything left out falls
//! back to the command line or the built-in default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::resolver::TimeoutPolicy;

/// Contents of a `.depguess.yml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Seconds to wait for each attempt.
    pub timeout: Option<u64>,

    /// Install without asking.
    pub yes: Option<bool>,

    /// Run inside a virtual environment.
    pub create_env: Option<bool>,

    /// Directory name of the virtual environment.
    pub env_name: Option<String>,

    /// Interpreter to use instead of the one found on `PATH`.
    pub python: Option<PathBuf>,

    /// Log verbosity.
    pub log_level: Option<LogLevel>,

    /// What a timed-out attempt means.
    pub timeout_policy: Option<TimeoutPolicy>,
}

/// Log verbosity, named the way Python's logging module names them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including each spawned process.
    Debug,
    /// Loop progress.
    #[default]
    Info,
    /// Timeouts and skipped installs.
    Warning,
    /// Failures only.
    Error,
    /// Same as `error`; accepted for compatibility.
    Critical,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }

    /// Whether a line of `severity` is shown when this is the threshold.
    pub fn allows(self, severity: LogLevel) -> bool {
        severity.rank() >= self.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error | Self::Critical => 3,
        }
    }
}
