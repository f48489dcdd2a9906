//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::FileConfig;
use crate::error::{DepguessError, Result};

/// File looked for in the working directory.
pub const CONFIG_FILE_NAME: &str = ".depguess.yml";

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DepguessError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DepguessError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content, using `source_path` for error reporting.
///
/// A file that is empty or only comments is an empty config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<FileConfig> {
    if content
        .lines()
        .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'))
    {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| DepguessError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the config for a run.
///
/// An explicit path must exist. Otherwise `.depguess.yml` in `dir` is used
/// when present, and a missing file means "no config".
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_config_file(path)?, Some(path.to_path_buf())));
    }

    let default_path = dir.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        tracing::debug!(path = %default_path.display(), "loading config file");
        Ok((load_config_file(&default_path)?, Some(default_path)))
    } else {
        Ok((FileConfig::default(), None))
    }
}
