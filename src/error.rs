//! Error types for depguess operations.
//!
//! This module defines [`DepguessError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Failures the resolution loop can act on (a missing module, a declined
//!   or failed install) are *not* errors; they end up in the loop's report
//! - `DepguessError` covers environmental problems that stop the run outright
//! - [`DepguessError::Cancelled`] is the operator pressing Ctrl-C at a prompt
//!   and must terminate the whole process
//! - Use `anyhow::Error` (via `DepguessError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for depguess operations.
#[derive(Debug, Error)]
pub enum DepguessError {
    /// The target script does not exist.
    #[error("Script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    /// The interpreter could not be located.
    #[error("Executable not found: {path}")]
    ExecutableNotFound { path: PathBuf },

    /// A child process could not be started, waited on or killed.
    #[error("Could not run '{command}': {message}")]
    CommandFailed { command: String, message: String },

    /// Creating the isolated environment failed.
    #[error("Failed to create environment '{name}': {message}")]
    EnvironmentCreation { name: String, message: String },

    /// The operator interrupted a prompt.
    #[error("Cancelled by user")]
    Cancelled,

    /// A prompt was needed but nobody is there to answer it.
    #[error("Cannot prompt for '{key}' in non-interactive mode")]
    PromptUnavailable { key: String },

    /// An explicitly requested config file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DepguessError {
    /// Whether this error is an operator cancel rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for depguess operations.
pub type Result<T> = std::result::Result<T, DepguessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_not_found_displays_path() {
        let err = DepguessError::ScriptNotFound {
            path: PathBuf::from("/tmp/app.py"),
        };
        assert!(err.to_string().contains("/tmp/app.py"));
    }

    #[test]
    fn executable_not_found_displays_path() {
        let err = DepguessError::ExecutableNotFound {
            path: PathBuf::from("env/bin/python"),
        };
        assert!(err.to_string().contains("env/bin/python"));
    }

    #[test]
    fn command_failed_displays_command_and_reason() {
        let err = DepguessError::CommandFailed {
            command: "python3 -m venv env".into(),
            message: "could not wait: interrupted".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'python3 -m venv env'"));
        assert!(msg.contains("could not wait"));
    }

    #[test]
    fn environment_creation_displays_name_and_message() {
        let err = DepguessError::EnvironmentCreation {
            name: "env".into(),
            message: "ensurepip is not available".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'env'"));
        assert!(msg.contains("ensurepip"));
    }

    #[test]
    fn cancelled_is_distinguishable() {
        assert!(DepguessError::Cancelled.is_cancelled());
        assert!(!DepguessError::PromptUnavailable { key: "x".into() }.is_cancelled());
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = DepguessError::ConfigParseError {
            path: PathBuf::from(".depguess.yml"),
            message: "invalid type".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".depguess.yml"));
        assert!(msg.contains("invalid type"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DepguessError = io_err.into();
        assert!(matches!(err, DepguessError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(DepguessError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
