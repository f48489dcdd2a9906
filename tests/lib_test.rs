//! Library integration tests.

use depguess::DepguessError;

#[test]
fn error_types_are_public() {
    let err = DepguessError::ScriptNotFound {
        path: "app.py".into(),
    };
    assert!(err.to_string().contains("app.py"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> depguess::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use depguess::cli::Cli;

    let cli = Cli::parse_from(["depguess", "app.py", "--yes", "--fork-timeout", "30"]);
    assert!(cli.yes);
    assert_eq!(cli.overrides().timeout, Some(30));
}

#[test]
fn resolver_types_are_public() {
    use depguess::resolver::{
        extract_missing_dependency, ResolutionReport, TerminalReason, MAX_ATTEMPTS,
    };

    assert_eq!(MAX_ATTEMPTS, 20);
    assert_eq!(
        extract_missing_dependency("ImportError: No module named numpy")
            .map(|name| name.into_string()),
        Some("numpy".to_string())
    );

    let report = ResolutionReport {
        reason: TerminalReason::InstallDeclined,
        attempts: 1,
        installed_packages: vec![],
        last_run: None,
        diagnostic: None,
    };
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn resolve_loop_runs_against_injected_target() {
    use depguess::environment::Runtime;
    use depguess::resolver::{
        resolve, ExecutionResult, InstallerContext, ResolveContext, ResolveOptions,
        TerminalReason, TimeoutPolicy,
    };
    use depguess::shell::CommandResult;
    use depguess::ui::MockUI;
    use std::cell::Cell;
    use std::path::Path;
    use std::time::Duration;

    let attempts = Cell::new(0);
    let run = |_: &Runtime, _: &Path, _: Duration| -> depguess::Result<ExecutionResult> {
        attempts.set(attempts.get() + 1);
        if attempts.get() == 1 {
            Ok(ExecutionResult::exited(1, "", "No module named \"yaml\""))
        } else {
            Ok(ExecutionResult::exited(0, "", ""))
        }
    };
    let pip = |_: &Runtime, _: &str| -> depguess::Result<CommandResult> {
        Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
    };
    let ctx = ResolveContext {
        run_target: &run,
        installer: InstallerContext {
            run_pip: &pip,
            is_elevated: &|| false,
        },
    };
    let options = ResolveOptions {
        script: "app.py".into(),
        timeout: Duration::from_secs(15),
        auto_confirm: false,
        timeout_policy: TimeoutPolicy::default(),
    };
    let mut ui = MockUI::new();
    ui.set_prompt_response("install_yaml", "yes");

    let report = resolve(&Runtime::isolated("env/bin/python"), &options, &mut ui, &ctx).unwrap();

    assert_eq!(report.reason, TerminalReason::Success);
    assert_eq!(report.installed_packages, ["yaml"]);
    assert_eq!(ui.prompts_shown(), ["install_yaml".to_string()]);
}
