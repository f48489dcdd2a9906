//! Per-run resolution state.

use std::fmt;

use crate::shell::CommandResult;

/// Outcome of one execution of the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Process exit status; `None` when the process was killed.
    pub exit_status: Option<i32>,
    /// Captured standard output.
    pub standard_output: String,
    /// Captured standard error.
    pub standard_error: String,
    /// Whether the attempt hit its deadline.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// A run that exited with `code`.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_status: Some(code),
            standard_output: stdout.into(),
            standard_error: stderr.into(),
            timed_out: false,
        }
    }

    /// A run killed at its deadline.
    pub fn timed_out(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_status: None,
            standard_output: stdout.into(),
            standard_error: stderr.into(),
            timed_out: true,
        }
    }

    /// Exited normally with status zero.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_status == Some(0)
    }
}

impl From<CommandResult> for ExecutionResult {
    fn from(result: CommandResult) -> Self {
        Self {
            exit_status: result.exit_code,
            standard_output: result.stdout,
            standard_error: result.stderr,
            timed_out: result.timed_out,
        }
    }
}

/// Why a resolution run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    /// The target exited with status zero.
    Success,
    /// The target was still running at the deadline.
    TimeoutAssumedSuccess,
    /// The target failed in a way no signature recognizes.
    UnrecognizedFailure,
    /// The operator refused an install.
    InstallDeclined,
    /// The package manager could not install a package.
    InstallFailed,
    /// Attempts ran out.
    RetryLimitExceeded,
}

impl TerminalReason {
    /// Short lowercase label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::TimeoutAssumedSuccess => "timeout_assumed_success",
            Self::UnrecognizedFailure => "unrecognized_failure",
            Self::InstallDeclined => "install_declined",
            Self::InstallFailed => "install_failed",
            Self::RetryLimitExceeded => "retry_limit_exceeded",
        }
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable bookkeeping owned by one resolution loop.
///
/// `installed_packages` only grows, in install order. A package that had
/// to be installed twice appears twice. Once `terminal_reason` is set the
/// state is frozen.
#[derive(Debug, Default)]
pub struct ResolutionState {
    attempt_count: u32,
    installed_packages: Vec<String>,
    terminal_reason: Option<TerminalReason>,
}

impl ResolutionState {
    /// Attempts started so far.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Packages installed so far, oldest first.
    pub fn installed_packages(&self) -> &[String] {
        &self.installed_packages
    }

    /// Why the run stopped, if it has.
    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        self.terminal_reason
    }

    /// Whether the run has stopped.
    pub fn is_finished(&self) -> bool {
        self.terminal_reason.is_some()
    }

    pub(super) fn begin_attempt(&mut self) -> u32 {
        debug_assert!(!self.is_finished());
        self.attempt_count += 1;
        self.attempt_count
    }

    pub(super) fn record_install(&mut self, package: &str) {
        self.installed_packages.push(package.to_string());
    }

    pub(super) fn finish(&mut self, reason: TerminalReason) {
        debug_assert!(!self.is_finished());
        self.terminal_reason = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn converts_from_command_result() {
        let result = CommandResult::failure(Some(1), "out".into(), "err".into(), Duration::ZERO);
        let execution = ExecutionResult::from(result);

        assert_eq!(execution, ExecutionResult::exited(1, "out", "err"));
        assert!(!execution.succeeded());
    }

    #[test]
    fn timed_out_is_never_success() {
        let execution = ExecutionResult::from(CommandResult::timeout(
            String::new(),
            String::new(),
            Duration::from_secs(1),
        ));
        assert!(execution.timed_out);
        assert!(!execution.succeeded());
    }

    #[test]
    fn state_keeps_install_order_and_repeats() {
        let mut state = ResolutionState::default();
        state.record_install("requests");
        state.record_install("yaml");
        state.record_install("requests");

        assert_eq!(state.installed_packages(), ["requests", "yaml", "requests"]);
    }

    #[test]
    fn state_counts_attempts_and_finishes() {
        let mut state = ResolutionState::default();
        assert_eq!(state.begin_attempt(), 1);
        assert_eq!(state.begin_attempt(), 2);
        assert!(!state.is_finished());

        state.finish(TerminalReason::Success);
        assert_eq!(state.attempt_count(), 2);
        assert_eq!(state.terminal_reason(), Some(TerminalReason::Success));
    }

    #[test]
    fn reason_labels() {
        assert_eq!(TerminalReason::RetryLimitExceeded.to_string(), "retry_limit_exceeded");
        assert_eq!(TerminalReason::InstallDeclined.as_str(), "install_declined");
    }
}
