//! Configuration loading.
//!
//! An optional `.depguess.yml` in the working directory (or the file given
//! with `--config`) supplies defaults; command-line flags win over it.

pub mod loader;
pub mod schema;
pub mod settings;

pub use loader::{load_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use schema::{FileConfig, LogLevel};
pub use settings::{Overrides, Settings};
