//! Platform-specific environment checks.

use std::path::{Path, PathBuf};

/// Check if running in a CI environment.
///
/// Used in `main()` to force non-interactive mode. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Find an executable by name on `PATH`.
///
/// Names containing a path separator are checked as-is. On Windows the
/// `.exe` suffix is tried when the name has no extension.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_in_dirs(name, std::env::split_paths(&path_var))
}

fn find_in_dirs<I>(name: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    for dir in dirs {
        for file_name in candidate_names(name) {
            let full = dir.join(&file_name);
            if is_executable(&full) {
                return Some(full);
            }
        }
    }
    None
}

fn candidate_names(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    if cfg!(target_os = "windows") && Path::new(name).extension().is_none() {
        names.push(format!("{}.exe", name));
    }
    names
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Whether `path` is an interpreter inside a Python virtual environment,
/// i.e. `<root>/bin/python` with a `<root>/pyvenv.cfg`.
pub fn is_virtualenv_interpreter(path: &Path) -> bool {
    path.parent()
        .and_then(Path::parent)
        .map(|root| root.join("pyvenv.cfg").is_file())
        .unwrap_or(false)
}
