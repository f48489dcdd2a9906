//! Operator-facing output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! Library code never prints directly; it is handed a `&mut dyn
//! UserInterface` and reports through it.
//!
//! # Example
//!
//! ```
//! use depguess::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("depguess");
//! ui.success("Done");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::{render_summary, OutputMode};
pub use prompts::confirm_on;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DepguessTheme};

use crate::config::LogLevel;
use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Lowest severity of progress line still shown.
    ///
    /// Messages, successes, headers and spinners count as `Info`;
    /// warnings as `Warning`. Errors, output blocks and the summary are
    /// always shown.
    fn set_log_level(&mut self, level: LogLevel);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    ///
    /// Returns [`DepguessError::Cancelled`](crate::DepguessError::Cancelled)
    /// when the operator interrupts the prompt.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Print captured program output verbatim under a label.
    fn show_output_block(&mut self, label: &str, content: &str);

    /// Print the final list of installed packages.
    fn show_summary(&mut self, installed: &[String]);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark the operation as ended without a verdict.
    fn finish_warning(&mut self, msg: &str);
}

/// A yes/no question to put to the operator.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for overrides and test lookup).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the operator just presses enter.
    pub default: bool,
}

impl Prompt {
    /// Create a confirm prompt that defaults to yes.
    pub fn confirm(key: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            default: true,
        }
    }
}

/// Parse a textual yes/no answer.
///
/// An empty answer means "accept the default", matching how the prompt
/// reads (`[Y/n]`).
pub fn parse_answer(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_confirm_defaults_to_yes() {
        let prompt = Prompt::confirm("install_requests", "Install?");
        assert_eq!(prompt.key, "install_requests");
        assert!(prompt.default);
    }

    #[test]
    fn parse_answer_accepts_common_forms() {
        assert_eq!(parse_answer("y", false), Some(true));
        assert_eq!(parse_answer(" YES ", false), Some(true));
        assert_eq!(parse_answer("no", true), Some(false));
        assert_eq!(parse_answer("0", true), Some(false));
    }

    #[test]
    fn parse_answer_empty_uses_default() {
        assert_eq!(parse_answer("", true), Some(true));
        assert_eq!(parse_answer("  ", false), Some(false));
    }

    #[test]
    fn parse_answer_rejects_garbage() {
        assert_eq!(parse_answer("maybe", true), None);
    }
}
