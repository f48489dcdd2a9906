//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::config::LogLevel;
use crate::error::Result;

use super::output::render_summary;
use super::{
    confirm_on, should_use_colors, DepguessTheme, NonInteractiveUI, OutputMode, ProgressSpinner,
    Prompt, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: DepguessTheme,
    mode: OutputMode,
    level: LogLevel,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            DepguessTheme::new()
        } else {
            DepguessTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
            level: LogLevel::default(),
        }
    }

    fn shows(&self, severity: LogLevel) -> bool {
        self.mode.shows_status() && self.level.allows(severity)
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_log_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn message(&mut self, msg: &str) {
        if self.shows(LogLevel::Info) {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.shows(LogLevel::Info) {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.shows(LogLevel::Warning) {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        confirm_on(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && self.level.allows(LogLevel::Info) {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.shows(LogLevel::Info) {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_output_block(&mut self, label: &str, content: &str) {
        if self.mode.shows_results() {
            writeln!(self.term, "\n{}", self.theme.format_block_label(label)).ok();
            writeln!(self.term, "{}", content).ok();
        }
    }

    fn show_summary(&mut self, installed: &[String]) {
        if self.mode.shows_results() {
            writeln!(self.term, "{}", render_summary(installed)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI for the current environment.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
