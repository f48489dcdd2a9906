//! Interpreter discovery and isolated environments.
//!
//! Determines which interpreter runs the target script. The priority chain is:
//!
//! 1. `--create-env`: a virtual environment under the working directory
//! 2. `--python` (or `python` in the config file)
//! 3. `python3`, then `python`, found on `PATH`

pub mod runtime;
pub mod venv;

pub use runtime::Runtime;
pub use venv::{provision, venv_python_path, ProvisionContext};
