//! Final report of a resolution run.

use crate::ui::UserInterface;

use super::state::{ExecutionResult, TerminalReason};

/// Everything the operator is told once the loop stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Why the run stopped.
    pub reason: TerminalReason,
    /// Attempts made.
    pub attempts: u32,
    /// Installed packages, oldest first.
    pub installed_packages: Vec<String>,
    /// Streams of the attempt that decided the outcome.
    pub last_run: Option<ExecutionResult>,
    /// Installer diagnostic for a declined or failed install.
    pub diagnostic: Option<String>,
}

impl ResolutionReport {
    /// Whether the target ended up running (or was assumed to).
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.reason,
            TerminalReason::Success | TerminalReason::TimeoutAssumedSuccess
        )
    }

    /// Process exit code for this outcome.
    ///
    /// Only an install that was refused or failed exits nonzero; the other
    /// outcomes are reported and the process exits cleanly.
    pub fn exit_code(&self) -> i32 {
        match self.reason {
            TerminalReason::InstallDeclined | TerminalReason::InstallFailed => 1,
            _ => 0,
        }
    }
}

/// Print the outcome-specific lines, then the summary block.
pub fn show_report(report: &ResolutionReport, ui: &mut dyn UserInterface) {
    match report.reason {
        TerminalReason::Success => {
            ui.success("Script execution successful. The script ran without any import errors.");
            if let Some(run) = &report.last_run {
                ui.show_output_block("STDOUT", &run.standard_output);
                if !run.standard_error.is_empty() {
                    ui.show_output_block("STDERR", &run.standard_error);
                }
            }
        }
        TerminalReason::TimeoutAssumedSuccess => {}
        TerminalReason::UnrecognizedFailure => {
            ui.error("Script failed with an error that is not a recognized import error.");
            if let Some(run) = &report.last_run {
                let code = run
                    .exit_status
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "none".to_string());
                ui.error(&format!("Return Code: {}", code));
                ui.show_output_block("STDOUT", &run.standard_output);
                ui.show_output_block("STDERR", &run.standard_error);
            }
        }
        TerminalReason::InstallDeclined => {
            if let Some(diagnostic) = &report.diagnostic {
                ui.error(diagnostic);
            }
        }
        TerminalReason::InstallFailed => {
            if let Some(diagnostic) = &report.diagnostic {
                ui.error(diagnostic);
            }
            ui.error("Aborting due to installation failure.");
        }
        TerminalReason::RetryLimitExceeded => {
            ui.error("Reached maximum number of retries. Aborting to prevent infinite loop.");
        }
    }

    ui.show_summary(&report.installed_packages);
}
