//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::config::LogLevel;
use crate::error::{DepguessError, Result};

use super::output::{render_output_block, render_summary};
use super::theme::DepguessTheme;
use super::{parse_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

const OVERRIDE_PREFIX: &str = "DEPGUESS_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts cannot be shown, so a confirm is answered from a
/// `DEPGUESS_PROMPT_<KEY>` environment variable when one is set and is
/// refused with [`DepguessError::PromptUnavailable`] otherwise. Pass
/// `--yes` to skip prompting entirely.
pub struct NonInteractiveUI {
    mode: OutputMode,
    level: LogLevel,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(OVERRIDE_PREFIX))
            .collect();

        Self {
            mode,
            level: LogLevel::default(),
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            level: LogLevel::default(),
            env_overrides: overrides,
        }
    }

    fn shows(&self, severity: LogLevel) -> bool {
        self.mode.shows_status() && self.level.allows(severity)
    }

    fn override_key(prompt_key: &str) -> String {
        let normalized: String = prompt_key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}{}", OVERRIDE_PREFIX, normalized)
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_log_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn message(&mut self, msg: &str) {
        if self.shows(LogLevel::Info) {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.shows(LogLevel::Info) {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.shows(LogLevel::Warning) {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = Self::override_key(&prompt.key);
        if let Some(answer) = self
            .env_overrides
            .get(&env_key)
            .and_then(|value| parse_answer(value, prompt.default))
        {
            return Ok(answer);
        }

        Err(DepguessError::PromptUnavailable {
            key: prompt.key.clone(),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let visible = self.shows(LogLevel::Info);
        if visible {
            println!("{}", message);
        }
        Box::new(NoopSpinner { visible })
    }

    fn show_header(&mut self, title: &str) {
        if self.shows(LogLevel::Info) {
            println!("\n{}\n", title);
        }
    }

    fn show_output_block(&mut self, label: &str, content: &str) {
        if self.mode.shows_results() {
            println!("{}", render_output_block(label, content));
        }
    }

    fn show_summary(&mut self, installed: &[String]) {
        if self.mode.shows_results() {
            println!("{}", render_summary(installed));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints its final line (for non-interactive mode).
struct NoopSpinner {
    visible: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.visible {
            println!("{}", DepguessTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.visible {
            println!("{}", DepguessTheme::plain().format_error(msg));
        }
    }

    fn finish_warning(&mut self, msg: &str) {
        if self.visible {
            println!("{}", DepguessTheme::plain().format_warning(msg));
        }
    }
}
