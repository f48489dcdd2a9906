//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{LogLevel, Overrides};
use crate::resolver::TimeoutPolicy;

/// Run a Python script, installing missing modules until it starts.
#[derive(Debug, Parser)]
#[command(name = "depguess")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the Python script to run
    pub script: PathBuf,

    /// Run inside a virtual environment, creating it if needed
    #[arg(long)]
    pub create_env: bool,

    /// Directory name of the virtual environment [default: env]
    #[arg(long, value_name = "NAME")]
    pub env_name: Option<String>,

    /// Seconds to wait for the script before assuming it started [default: 15]
    #[arg(long = "fork-timeout", visible_alias = "timeout", value_name = "SECS")]
    pub fork_timeout: Option<u64>,

    /// Answer yes to every install prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Interpreter to use instead of python3/python from PATH
    #[arg(long, value_name = "PATH", env = "DEPGUESS_PYTHON")]
    pub python: Option<PathBuf>,

    /// Log verbosity [default: info, or RUST_LOG when set]
    #[arg(long, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Inspect the output of a timed-out run instead of assuming success
    #[arg(long)]
    pub strict_timeout: bool,

    /// Path to config file (overrides default .depguess.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Settings given on the command line; unset flags stay `None` so the
    /// config file can supply them.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            timeout: self.fork_timeout,
            yes: self.yes.then_some(true),
            create_env: self.create_env.then_some(true),
            env_name: self.env_name.clone(),
            python: self.python.clone(),
            log_level: self.log_level,
            timeout_policy: self.strict_timeout.then_some(TimeoutPolicy::Inspect),
        }
    }
}
