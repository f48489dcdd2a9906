//! Package installation for a detected missing dependency.
//!
//! Asks the operator (unless auto-confirm is on), then runs the package
//! manager through the runtime. Every outcome short of an operator
//! interrupt comes back as a [`RemediationOutcome`]; the resolution loop
//! decides what happens next.

use std::ffi::OsStr;

use crate::environment::Runtime;
use crate::error::{DepguessError, Result};
use crate::shell::{execute, is_elevated, CommandOptions, CommandResult};
use crate::ui::{Prompt, UserInterface};

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run `<runtime> -m pip install <package>`.
    pub run_pip: &'a dyn Fn(&Runtime, &str) -> Result<CommandResult>,
    /// Whether the process runs with administrator rights.
    pub is_elevated: &'a dyn Fn() -> bool,
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        run_pip: &|runtime, package| {
            execute(
                runtime.executable(),
                &[
                    OsStr::new("-m"),
                    OsStr::new("pip"),
                    OsStr::new("install"),
                    OsStr::new(package),
                ],
                &CommandOptions::default(),
            )
        },
        is_elevated: &is_elevated,
    }
}

/// What came of trying to install one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationOutcome {
    /// The package manager exited cleanly.
    Installed {
        /// Package manager stdout.
        output: String,
    },
    /// The operator said no (or could not be asked).
    Declined {
        /// Why nothing was installed.
        diagnostic: String,
    },
    /// The install was attempted, or could not be attempted, and failed.
    Failed {
        /// What went wrong, for the operator.
        diagnostic: String,
    },
}

impl RemediationOutcome {
    /// Whether the package is now installed.
    pub fn installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    /// Why nothing was installed; empty for an install.
    pub fn diagnostic(&self) -> &str {
        match self {
            Self::Installed { .. } => "",
            Self::Declined { diagnostic } | Self::Failed { diagnostic } => diagnostic,
        }
    }
}

/// Install `package` into `runtime`.
///
/// Returns `Err` only for [`DepguessError::Cancelled`], which must stop
/// the whole run.
pub fn install(
    package: &str,
    runtime: &Runtime,
    auto_confirm: bool,
    ui: &mut dyn UserInterface,
    ctx: &InstallerContext<'_>,
) -> Result<RemediationOutcome> {
    if package.is_empty() {
        return Ok(RemediationOutcome::Failed {
            diagnostic: "No package name provided.".to_string(),
        });
    }

    if !auto_confirm {
        if let Some(outcome) = ask_operator(package, ui)? {
            return Ok(outcome);
        }
    }

    if (ctx.is_elevated)() && !runtime.is_isolated() {
        ui.warning("Running as root: packages will be installed into the system interpreter.");
    }

    tracing::info!(package, runtime = %runtime, "installing package");
    let mut spinner = ui.start_spinner(&format!("Installing '{}' with pip...", package));

    let result = match (ctx.run_pip)(runtime, package) {
        Ok(result) => result,
        Err(DepguessError::ExecutableNotFound { path }) => {
            spinner.finish_error(&format!("Could not install '{}'", package));
            return Ok(RemediationOutcome::Failed {
                diagnostic: format!(
                    "'{}' command not found. Is Python installed and in your PATH?",
                    path.display()
                ),
            });
        }
        Err(e) => {
            spinner.finish_error(&format!("Could not install '{}'", package));
            return Ok(RemediationOutcome::Failed {
                diagnostic: format!("Failed to install '{}': {}", package, e),
            });
        }
    };

    if result.success {
        spinner.finish_success(&format!("Successfully installed '{}'", package));
        if ui.output_mode().shows_command_output() && !result.stdout.trim().is_empty() {
            ui.message(result.stdout.trim_end());
        }
        return Ok(RemediationOutcome::Installed {
            output: result.stdout,
        });
    }

    spinner.finish_error(&format!("Failed to install '{}'", package));
    tracing::warn!(package, exit_code = ?result.exit_code, "package install failed");
    Ok(RemediationOutcome::Failed {
        diagnostic: install_failure_message(package, &result),
    })
}

/// `Some(outcome)` when the operator did not agree to the install.
fn ask_operator(package: &str, ui: &mut dyn UserInterface) -> Result<Option<RemediationOutcome>> {
    let prompt = Prompt::confirm(
        format!("install_{}", package),
        format!("Missing package '{}'. Install with pip?", package),
    );

    let declined = || RemediationOutcome::Declined {
        diagnostic: format!("User declined to install {}.", package),
    };

    match ui.confirm(&prompt) {
        Ok(true) => Ok(None),
        Ok(false) => {
            ui.warning(&format!("Skipping installation of '{}'.", package));
            Ok(Some(declined()))
        }
        Err(DepguessError::PromptUnavailable { .. }) => {
            ui.warning(&format!(
                "Cannot ask whether to install '{}' without a terminal. Pass --yes to install automatically.",
                package
            ));
            Ok(Some(declined()))
        }
        Err(e) => Err(e),
    }
}

fn install_failure_message(package: &str, result: &CommandResult) -> String {
    let status = result
        .exit_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Failed to install '{}'.\npip exited with status {}.\nStderr:\n{}",
        package, status, result.stderr
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;
    use std::time::Duration;

    fn ok_pip(stdout: &str) -> CommandResult {
        CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
    }

    fn runtime() -> Runtime {
        Runtime::isolated("env/bin/python")
    }

    #[test]
    fn empty_name_fails_without_prompting() {
        let ctx = InstallerContext {
            run_pip: &|_, _| panic!("pip must not run"),
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();

        let outcome = install("", &runtime(), false, &mut ui, &ctx).unwrap();

        assert_eq!(outcome.diagnostic(), "No package name provided.");
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn confirmed_install_runs_pip_and_shows_output() {
        let seen = RefCell::new(Vec::new());
        let run = |rt: &Runtime, pkg: &str| -> Result<CommandResult> {
            seen.borrow_mut()
                .push((rt.executable().to_path_buf(), pkg.to_string()));
            Ok(ok_pip("Successfully installed requests-2.32.0\n"))
        };
        let ctx = InstallerContext {
            run_pip: &run,
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_requests", "y");

        let outcome = install("requests", &runtime(), false, &mut ui, &ctx).unwrap();

        assert!(outcome.installed());
        assert_eq!(outcome.diagnostic(), "");
        assert_eq!(
            seen.borrow().as_slice(),
            [(PathBuf::from("env/bin/python"), "requests".to_string())]
        );
        assert_eq!(ui.prompts_shown(), ["install_requests".to_string()]);
        assert!(ui.has_message("Successfully installed requests-2.32.0"));
    }

    #[test]
    fn quiet_mode_hides_pip_output() {
        let ctx = InstallerContext {
            run_pip: &|_, _| Ok(ok_pip("lots of pip output\n")),
            is_elevated: &|| false,
        };
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let outcome = install("rich", &runtime(), true, &mut ui, &ctx).unwrap();

        assert!(outcome.installed());
        assert!(!ui.has_message("lots of pip output"));
    }

    #[test]
    fn auto_confirm_skips_prompt() {
        let ctx = InstallerContext {
            run_pip: &|_, _| Ok(ok_pip("")),
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();

        install("yaml", &runtime(), true, &mut ui, &ctx).unwrap();
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn declined_prompt_never_runs_pip() {
        let calls = Cell::new(0);
        let run = |_: &Runtime, _: &str| -> Result<CommandResult> {
            calls.set(calls.get() + 1);
            Ok(ok_pip(""))
        };
        let ctx = InstallerContext {
            run_pip: &run,
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_requests", "n");

        let outcome = install("requests", &runtime(), false, &mut ui, &ctx).unwrap();

        assert_eq!(
            outcome,
            RemediationOutcome::Declined {
                diagnostic: "User declined to install requests.".to_string()
            }
        );
        assert_eq!(calls.get(), 0);
        assert!(ui.has_warning("Skipping installation of 'requests'."));
    }

    #[test]
    fn unavailable_prompt_counts_as_decline() {
        let ctx = InstallerContext {
            run_pip: &|_, _| panic!("pip must not run"),
            is_elevated: &|| false,
        };
        let mut ui = crate::ui::NonInteractiveUI::with_overrides(
            OutputMode::Silent,
            Default::default(),
        );

        let outcome = install("requests", &runtime(), false, &mut ui, &ctx).unwrap();
        assert!(matches!(outcome, RemediationOutcome::Declined { .. }));
    }

    #[test]
    fn interrupt_propagates_as_cancelled() {
        let ctx = InstallerContext {
            run_pip: &|_, _| panic!("pip must not run"),
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();
        ui.cancel_prompt("install_requests");

        let err = install("requests", &runtime(), false, &mut ui, &ctx).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn nonzero_pip_exit_reports_status_and_stderr() {
        let ctx = InstallerContext {
            run_pip: &|_, _| {
                Ok(CommandResult::failure(
                    Some(1),
                    String::new(),
                    "ERROR: No matching distribution found for nosuchpkg\n".to_string(),
                    Duration::ZERO,
                ))
            },
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();

        let outcome = install("nosuchpkg", &runtime(), true, &mut ui, &ctx).unwrap();

        let diagnostic = outcome.diagnostic();
        assert!(diagnostic.starts_with("Failed to install 'nosuchpkg'.\n"));
        assert!(diagnostic.contains("pip exited with status 1."));
        assert!(diagnostic.contains("No matching distribution found"));
        assert!(matches!(outcome, RemediationOutcome::Failed { .. }));
    }

    #[test]
    fn missing_runtime_is_a_failed_outcome() {
        let ctx = InstallerContext {
            run_pip: &|rt, _| {
                Err(DepguessError::ExecutableNotFound {
                    path: rt.executable().to_path_buf(),
                })
            },
            is_elevated: &|| false,
        };
        let mut ui = MockUI::new();

        let outcome = install("requests", &runtime(), true, &mut ui, &ctx).unwrap();

        assert_eq!(
            outcome.diagnostic(),
            "'env/bin/python' command not found. Is Python installed and in your PATH?"
        );
    }

    #[test]
    fn root_install_into_system_interpreter_warns() {
        let ctx = InstallerContext {
            run_pip: &|_, _| Ok(ok_pip("")),
            is_elevated: &|| true,
        };
        let mut ui = MockUI::new();

        install("requests", &Runtime::new("/usr/bin/python3"), true, &mut ui, &ctx).unwrap();
        assert!(ui.has_warning("Running as root"));

        let mut ui = MockUI::new();
        install("requests", &runtime(), true, &mut ui, &ctx).unwrap();
        assert!(ui.warnings().is_empty());
    }
}
