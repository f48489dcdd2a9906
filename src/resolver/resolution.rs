//! The run, diagnose, install, retry loop.
//!
//! Each iteration runs the target once. A clean exit or a timeout ends the
//! run; a failure whose diagnostics name a missing module triggers one
//! install and another iteration; anything else ends the run. The loop
//! never starts attempt [`MAX_ATTEMPTS`] + 1.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::environment::Runtime;
use crate::error::Result;
use crate::shell::{execute, CommandOptions};
use crate::ui::UserInterface;

use super::installer::{self, InstallerContext, RemediationOutcome};
use super::report::ResolutionReport;
use super::signature::extract_missing_dependency;
use super::state::{ExecutionResult, ResolutionState, TerminalReason};

/// Hard ceiling on executions of the target per run.
pub const MAX_ATTEMPTS: u32 = 20;

/// What a run that outlives its deadline means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// A long-running target got past its imports; call it resolved.
    #[default]
    AssumeSuccess,
    /// Look at whatever the killed run wrote to stderr before deciding.
    Inspect,
}

/// Inputs for one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Script handed to the runtime.
    pub script: PathBuf,
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Install without asking.
    pub auto_confirm: bool,
    /// How to read a deadline expiry.
    pub timeout_policy: TimeoutPolicy,
}

/// Mockable dependencies for the loop.
pub struct ResolveContext<'a> {
    /// Run `<runtime> <script>` with a deadline.
    pub run_target: &'a dyn Fn(&Runtime, &Path, Duration) -> Result<ExecutionResult>,
    /// Dependencies for the installer.
    pub installer: InstallerContext<'a>,
}

/// Build the default `ResolveContext` for production use.
pub fn default_context() -> ResolveContext<'static> {
    ResolveContext {
        run_target: &|runtime, script, timeout| {
            let options = CommandOptions {
                inherit_stdin: true,
                timeout: Some(timeout),
            };
            let args: [&OsStr; 1] = [script.as_os_str()];
            execute(runtime.executable(), &args, &options).map(ExecutionResult::from)
        },
        installer: installer::default_context(),
    }
}

/// Whether the loop should go around again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A package was installed; run the target again.
    Continue,
    /// The run is over.
    Done(TerminalReason),
}

/// Drives one run against one target.
pub struct ResolutionLoop<'a> {
    runtime: &'a Runtime,
    options: &'a ResolveOptions,
    ctx: &'a ResolveContext<'a>,
    state: ResolutionState,
    last_run: Option<ExecutionResult>,
    diagnostic: Option<String>,
}

impl<'a> ResolutionLoop<'a> {
    /// Set up a fresh run.
    pub fn new(runtime: &'a Runtime, options: &'a ResolveOptions, ctx: &'a ResolveContext<'a>) -> Self {
        Self {
            runtime,
            options,
            ctx,
            state: ResolutionState::default(),
            last_run: None,
            diagnostic: None,
        }
    }

    /// Current bookkeeping.
    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// Run one iteration.
    ///
    /// Calling this again after [`Step::Done`] returns the same reason
    /// without running anything.
    pub fn step(&mut self, ui: &mut dyn UserInterface) -> Result<Step> {
        if let Some(reason) = self.state.terminal_reason() {
            return Ok(Step::Done(reason));
        }

        if self.state.attempt_count() >= MAX_ATTEMPTS {
            tracing::error!(attempts = self.state.attempt_count(), "retry limit reached");
            return Ok(self.finish(TerminalReason::RetryLimitExceeded));
        }

        let attempt = self.state.begin_attempt();
        let script = self.options.script.display().to_string();
        let mut spinner = ui.start_spinner(&format!(
            "Attempt {}: running '{}' using '{}'",
            attempt, script, self.runtime
        ));

        let run = (self.ctx.run_target)(self.runtime, &self.options.script, self.options.timeout);
        let run = match run {
            Ok(run) => run,
            Err(e) => {
                spinner.finish_error(&format!("Attempt {}: could not run '{}'", attempt, script));
                return Err(e);
            }
        };
        tracing::debug!(attempt, exit_status = ?run.exit_status, timed_out = run.timed_out, "attempt finished");

        if run.timed_out {
            spinner.finish_warning(&format!(
                "Attempt {}: still running after {} seconds",
                attempt,
                self.options.timeout.as_secs()
            ));
            if self.options.timeout_policy == TimeoutPolicy::AssumeSuccess {
                ui.warning(&format!(
                    "The script ran for more than the specified timeout of {} seconds without exiting.",
                    self.options.timeout.as_secs()
                ));
                ui.message("Assuming all dependencies are resolved.");
                self.last_run = Some(run);
                return Ok(self.finish(TerminalReason::TimeoutAssumedSuccess));
            }
        } else if run.succeeded() {
            spinner.finish_success(&format!("Attempt {}: script ran without import errors", attempt));
            self.last_run = Some(run);
            return Ok(self.finish(TerminalReason::Success));
        } else {
            spinner.finish_error(&format!(
                "Attempt {}: script exited with status {}",
                attempt,
                describe_status(run.exit_status)
            ));
        }

        let Some(missing) = extract_missing_dependency(&run.standard_error) else {
            self.last_run = Some(run);
            return Ok(self.finish(TerminalReason::UnrecognizedFailure));
        };
        self.last_run = Some(run);

        ui.message(&format!("Detected missing module: '{}'", missing));
        let outcome = installer::install(
            missing.as_str(),
            self.runtime,
            self.options.auto_confirm,
            ui,
            &self.ctx.installer,
        )?;

        match outcome {
            RemediationOutcome::Installed { .. } => {
                self.state.record_install(missing.as_str());
                tracing::info!(package = %missing, attempt, "installed, retrying");
                Ok(Step::Continue)
            }
            RemediationOutcome::Declined { diagnostic } => {
                self.diagnostic = Some(diagnostic);
                Ok(self.finish(TerminalReason::InstallDeclined))
            }
            RemediationOutcome::Failed { diagnostic } => {
                self.diagnostic = Some(diagnostic);
                Ok(self.finish(TerminalReason::InstallFailed))
            }
        }
    }

    /// Step until the run ends and build its report.
    pub fn run(mut self, ui: &mut dyn UserInterface) -> Result<ResolutionReport> {
        while self.step(ui)? == Step::Continue {}
        Ok(self.into_report())
    }

    fn finish(&mut self, reason: TerminalReason) -> Step {
        tracing::info!(reason = %reason, attempts = self.state.attempt_count(), "resolution finished");
        self.state.finish(reason);
        Step::Done(reason)
    }

    fn into_report(self) -> ResolutionReport {
        let reason = self
            .state
            .terminal_reason()
            .unwrap_or(TerminalReason::RetryLimitExceeded);
        ResolutionReport {
            reason,
            attempts: self.state.attempt_count(),
            installed_packages: self.state.installed_packages().to_vec(),
            last_run: self.last_run,
            diagnostic: self.diagnostic,
        }
    }
}

/// Run the loop to completion.
pub fn resolve(
    runtime: &Runtime,
    options: &ResolveOptions,
    ui: &mut dyn UserInterface,
    ctx: &ResolveContext<'_>,
) -> Result<ResolutionReport> {
    ResolutionLoop::new(runtime, options, ctx).run(ui)
}

fn describe_status(status: Option<i32>) -> String {
    status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "unknown (terminated by signal)".to_string())
}
