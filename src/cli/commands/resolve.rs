//! Resolve command implementation.
//!
//! Picks the interpreter, provisions an environment when asked, runs the
//! resolution loop and prints its report.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::environment::{self, ProvisionContext, Runtime};
use crate::error::{DepguessError, Result};
use crate::resolver::{self, show_report, ResolveContext, ResolveOptions};
use crate::ui::UserInterface;

use super::command::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand {
    work_dir: PathBuf,
    settings: Settings,
}

impl ResolveCommand {
    /// Create a new resolve command running in `work_dir`.
    pub fn new(work_dir: &Path, settings: Settings) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            settings,
        }
    }

    /// Get the effective settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn options(&self) -> ResolveOptions {
        ResolveOptions {
            script: self.settings.script.clone(),
            timeout: self.settings.timeout,
            auto_confirm: self.settings.auto_confirm,
            timeout_policy: self.settings.timeout_policy,
        }
    }

    fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        provision_ctx: &ProvisionContext<'_>,
        resolve_ctx: &ResolveContext<'_>,
    ) -> Result<CommandResult> {
        let script = &self.settings.script;
        if !self.work_dir.join(script).is_file() {
            return Err(DepguessError::ScriptNotFound {
                path: script.clone(),
            });
        }

        let mut runtime = Runtime::discover(self.settings.python.as_deref())?;
        tracing::debug!(runtime = %runtime, isolated = runtime.is_isolated(), "selected interpreter");

        if self.settings.create_env {
            runtime = environment::provision(
                &self.work_dir,
                &self.settings.env_name,
                &runtime,
                ui,
                provision_ctx,
            )?;
            ui.message(&format!("Using Python interpreter from venv: '{}'", runtime));
        }

        ui.show_header(&format!("Resolving dependencies for {}", script.display()));

        let report = resolver::resolve(&runtime, &self.options(), ui, resolve_ctx)?;
        show_report(&report, ui);

        Ok(CommandResult {
            success: report.is_resolved(),
            exit_code: report.exit_code(),
        })
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(
            ui,
            &environment::venv::default_context(),
            &resolver::resolution::default_context(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfig, Overrides};
    use crate::resolver::{ExecutionResult, InstallerContext};
    use crate::shell::CommandResult as ProcessResult;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Project {
        temp: TempDir,
        python: PathBuf,
    }

    fn project() -> Project {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.py"), "import requests\n").unwrap();
        let python = temp.path().join("python3");
        fs::write(&python, "").unwrap();
        Project { temp, python }
    }

    fn settings(project: &Project, overrides: Overrides) -> Settings {
        let overrides = Overrides {
            python: Some(project.python.clone()),
            yes: Some(true),
            ..overrides
        };
        Settings::resolve(
            project.temp.path().join("app.py"),
            overrides,
            FileConfig::default(),
        )
        .unwrap()
    }

    fn pip_ok(_: &Runtime, _: &str) -> Result<ProcessResult> {
        Ok(ProcessResult::success(String::new(), String::new(), Duration::ZERO))
    }

    fn not_root() -> bool {
        false
    }

    fn no_venv(_: &Runtime, _: &Path) -> Result<ProcessResult> {
        panic!("no environment should be created")
    }

    #[test]
    fn missing_script_is_fatal() {
        let project = project();
        let mut settings = settings(&project, Overrides::default());
        settings.script = project.temp.path().join("missing.py");
        let cmd = ResolveCommand::new(project.temp.path(), settings);
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, DepguessError::ScriptNotFound { .. }));
    }

    #[test]
    fn missing_interpreter_is_fatal() {
        let project = project();
        let overrides = Overrides {
            python: None,
            ..Default::default()
        };
        let mut settings = settings(&project, overrides);
        settings.python = Some(project.temp.path().join("nope").join("python"));
        let cmd = ResolveCommand::new(project.temp.path(), settings);
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, DepguessError::ExecutableNotFound { .. }));
    }

    #[test]
    fn installs_then_reports_success() {
        let project = project();
        let cmd = ResolveCommand::new(project.temp.path(), settings(&project, Overrides::default()));
        let runs = RefCell::new(vec![
            ExecutionResult::exited(0, "ready\n", ""),
            ExecutionResult::exited(1, "", "ModuleNotFoundError: No module named 'requests'\n"),
        ]);
        let run = |_: &Runtime, _: &Path, _: Duration| -> Result<ExecutionResult> {
            Ok(runs.borrow_mut().pop().unwrap())
        };
        let resolve_ctx = ResolveContext {
            run_target: &run,
            installer: InstallerContext {
                run_pip: &pip_ok,
                is_elevated: &not_root,
            },
        };
        let provision_ctx = ProvisionContext { create_venv: &no_venv };
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &provision_ctx, &resolve_ctx).unwrap();

        assert_eq!(result, CommandResult::success());
        assert_eq!(ui.headers().len(), 1);
        assert_eq!(ui.output_block("STDOUT"), Some("ready\n"));
        assert_eq!(ui.summaries(), [vec!["requests".to_string()]]);
    }

    #[test]
    fn failed_install_exits_one() {
        let project = project();
        let cmd = ResolveCommand::new(project.temp.path(), settings(&project, Overrides::default()));
        let run = |_: &Runtime, _: &Path, _: Duration| -> Result<ExecutionResult> {
            Ok(ExecutionResult::exited(1, "", "No module named 'nosuchpkg'\n"))
        };
        let pip = |_: &Runtime, _: &str| -> Result<ProcessResult> {
            Ok(ProcessResult::failure(Some(1), String::new(), "boom\n".into(), Duration::ZERO))
        };
        let resolve_ctx = ResolveContext {
            run_target: &run,
            installer: InstallerContext {
                run_pip: &pip,
                is_elevated: &not_root,
            },
        };
        let provision_ctx = ProvisionContext { create_venv: &no_venv };
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &provision_ctx, &resolve_ctx).unwrap();

        assert_eq!(result, CommandResult::failure(1));
        assert!(ui.has_error("Aborting due to installation failure."));
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn create_env_runs_inside_environment() {
        let project = project();
        let overrides = Overrides {
            create_env: Some(true),
            ..Default::default()
        };
        let cmd = ResolveCommand::new(project.temp.path(), settings(&project, overrides));
        let create = |_: &Runtime, dir: &Path| -> Result<ProcessResult> {
            let python = environment::venv_python_path(dir);
            fs::create_dir_all(python.parent().unwrap()).unwrap();
            fs::write(&python, "").unwrap();
            Ok(ProcessResult::success(String::new(), String::new(), Duration::ZERO))
        };
        let used = RefCell::new(None);
        let run = |rt: &Runtime, _: &Path, _: Duration| -> Result<ExecutionResult> {
            *used.borrow_mut() = Some(rt.clone());
            Ok(ExecutionResult::exited(0, "", ""))
        };
        let resolve_ctx = ResolveContext {
            run_target: &run,
            installer: InstallerContext {
                run_pip: &pip_ok,
                is_elevated: &not_root,
            },
        };
        let provision_ctx = ProvisionContext { create_venv: &create };
        let mut ui = MockUI::new();

        cmd.execute_with(&mut ui, &provision_ctx, &resolve_ctx).unwrap();

        let used = used.borrow().clone().unwrap();
        assert!(used.is_isolated());
        assert_eq!(
            used.executable(),
            environment::venv_python_path(&project.temp.path().join("env"))
        );
        assert!(ui.has_message("Using Python interpreter from venv"));
    }

    #[test]
    fn unrecognized_failure_exits_zero_but_is_not_success() {
        let project = project();
        let cmd = ResolveCommand::new(project.temp.path(), settings(&project, Overrides::default()));
        let run = |_: &Runtime, _: &Path, _: Duration| -> Result<ExecutionResult> {
            Ok(ExecutionResult::exited(1, "", "SyntaxError: invalid syntax\n"))
        };
        let resolve_ctx = ResolveContext {
            run_target: &run,
            installer: InstallerContext {
                run_pip: &pip_ok,
                is_elevated: &not_root,
            },
        };
        let provision_ctx = ProvisionContext { create_venv: &no_venv };
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &provision_ctx, &resolve_ctx).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(!result.success);
        assert_eq!(cmd.settings().env_name, "env");
    }
}
