//! depguess CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use depguess::cli::{Cli, Command, ResolveCommand};
use depguess::config::{load_config, LogLevel, Settings};
use depguess::shell::is_ci;
use depguess::ui::{create_ui, OutputMode, UserInterface};
use depguess::DepguessError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code for an operator interrupt (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--log-level` (or `log_level` in the config file)
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("depguess={}", level.directive())),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depguess=info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(!is_ci(), output_mode);

    let work_dir = std::env::current_dir().unwrap_or_default();
    let settings = match load_config(&work_dir, cli.config.as_deref())
        .and_then(|(file, _)| Settings::resolve(cli.script.clone(), cli.overrides(), file))
    {
        Ok(settings) => settings,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    init_tracing(settings.log_level);
    ui.set_log_level(settings.log_level.unwrap_or_default());
    tracing::debug!("depguess starting with args: {:?}", cli);

    let command = ResolveCommand::new(&work_dir, settings);
    run(&command, ui.as_mut())
}

fn run(command: &dyn Command, ui: &mut dyn UserInterface) -> ExitCode {
    match command.execute(ui) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(DepguessError::Cancelled) => {
            ui.error("Installation cancelled by user.");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
