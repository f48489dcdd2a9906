//! The interpreter used to run the target and the package manager.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DepguessError, Result};
use crate::shell::{find_on_path, is_virtualenv_interpreter};

/// Interpreter names tried on `PATH`, in order.
pub fn system_interpreter_names() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["python", "python3"]
    } else {
        &["python3", "python"]
    }
}

/// Resolved handle to a Python interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    executable: PathBuf,
    isolated: bool,
}

impl Runtime {
    /// Wrap an interpreter path, detecting whether it lives in a virtualenv.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let isolated = is_virtualenv_interpreter(&executable);
        Self {
            executable,
            isolated,
        }
    }

    /// Wrap an interpreter known to belong to an isolated environment.
    pub fn isolated(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            isolated: true,
        }
    }

    /// Locate the interpreter to use.
    ///
    /// An explicit path must exist; a bare name is looked up on `PATH`.
    /// With nothing given, the platform's usual interpreter names are
    /// tried on `PATH`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_explicit(path),
            None => system_interpreter_names()
                .iter()
                .find_map(|name| find_on_path(name))
                .map(Self::new)
                .ok_or_else(|| DepguessError::ExecutableNotFound {
                    path: PathBuf::from(system_interpreter_names()[0]),
                }),
        }
    }

    fn from_explicit(path: &Path) -> Result<Self> {
        if path.is_file() {
            return Ok(Self::new(path));
        }
        let bare = path.components().count() == 1;
        path.to_str()
            .filter(|_| bare)
            .and_then(find_on_path)
            .map(Self::new)
            .ok_or_else(|| DepguessError::ExecutableNotFound {
                path: path.to_path_buf(),
            })
    }

    /// Path to the interpreter executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether installs land in an isolated environment rather than the
    /// system interpreter.
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable.display())
    }
}
