//! Process execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{execute, render_command, CommandOptions, CommandResult};
pub use platform::{find_on_path, is_ci, is_elevated, is_virtualenv_interpreter};
