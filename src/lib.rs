//! depguess - install a Python script's missing modules by running it.
//!
//! depguess runs a script, reads the "No module named ..." diagnostics it
//! fails with, installs the named package with pip and tries again, until
//! the script starts cleanly or a stop condition is reached.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and precedence
//! - [`environment`] - Interpreter discovery and virtual environments
//! - [`error`] - Error types and result aliases
//! - [`resolver`] - Failure signatures, installer and the retry loop
//! - [`shell`] - Process execution with deadlines
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use depguess::resolver::extract_missing_dependency;
//!
//! let stderr = "ModuleNotFoundError: No module named 'requests'";
//! let missing = extract_missing_dependency(stderr).unwrap();
//! assert_eq!(missing.as_str(), "requests");
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod resolver;
pub mod shell;
pub mod ui;

pub use error::{DepguessError, Result};
