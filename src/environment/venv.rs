//! Isolated environment provisioning.
//!
//! Creates (or reuses) a virtual environment next to the working directory
//! and hands back the interpreter inside it, so that every install and
//! every attempt runs against that environment instead of the system one.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{DepguessError, Result};
use crate::shell::{execute, CommandOptions, CommandResult};
use crate::ui::UserInterface;

use super::runtime::Runtime;

/// Mockable dependencies for provisioning.
pub struct ProvisionContext<'a> {
    /// Create a virtual environment at the given directory using the
    /// given base interpreter.
    pub create_venv: &'a dyn Fn(&Runtime, &Path) -> Result<CommandResult>,
}

/// Build the default `ProvisionContext` for production use.
pub fn default_context() -> ProvisionContext<'static> {
    ProvisionContext {
        create_venv: &|system, dir| {
            execute(
                system.executable(),
                &[OsStr::new("-m"), OsStr::new("venv"), dir.as_os_str()],
                &CommandOptions::default(),
            )
        },
    }
}

/// Interpreter location inside a virtual environment rooted at `dir`.
pub fn venv_python_path(dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        dir.join("Scripts").join("python.exe")
    } else {
        dir.join("bin").join("python")
    }
}

/// Make sure the environment `name` exists under `base` and return its
/// interpreter.
///
/// An existing directory is reused as-is with a warning.
pub fn provision(
    base: &Path,
    name: &str,
    system: &Runtime,
    ui: &mut dyn UserInterface,
    ctx: &ProvisionContext<'_>,
) -> Result<Runtime> {
    let dir = base.join(name);

    if dir.exists() {
        ui.warning(&format!(
            "Directory '{}' already exists. Using existing environment.",
            name
        ));
    } else {
        let mut spinner = ui.start_spinner(&format!("Creating virtual environment '{}'", name));
        let result = (ctx.create_venv)(system, &dir)?;
        if !result.success {
            spinner.finish_error(&format!("Could not create environment '{}'", name));
            return Err(DepguessError::EnvironmentCreation {
                name: name.to_string(),
                message: creation_failure_message(&result),
            });
        }
        spinner.finish_success(&format!("Created virtual environment '{}'", name));
    }

    let python = venv_python_path(&dir);
    if !python.is_file() {
        return Err(DepguessError::ExecutableNotFound { path: python });
    }

    tracing::info!(env = %dir.display(), python = %python.display(), "using isolated environment");
    Ok(Runtime::isolated(python))
}

fn creation_failure_message(result: &CommandResult) -> String {
    let stderr = result.stderr.trim();
    match (result.exit_code, stderr.is_empty()) {
        (Some(code), true) => format!("venv exited with status {}", code),
        (None, true) => "venv was terminated by a signal".to_string(),
        (_, false) => stderr.to_string(),
    }
}
