//! Dependency resolution.
//!
//! - [`signature`]: recognizes "missing module" diagnostics
//! - [`installer`]: installs one package, asking first unless told not to
//! - [`resolution`]: the retry loop
//! - [`report`]: what the operator sees when the loop stops

pub mod installer;
pub mod report;
pub mod resolution;
pub mod signature;
pub mod state;

pub use installer::{install, InstallerContext, RemediationOutcome};
pub use report::{show_report, ResolutionReport};
pub use resolution::{
    resolve, ResolutionLoop, ResolveContext, ResolveOptions, Step, TimeoutPolicy, MAX_ATTEMPTS,
};
pub use signature::{extract_missing_dependency, DependencyName, SIGNATURES};
pub use state::{ExecutionResult, ResolutionState, TerminalReason};
