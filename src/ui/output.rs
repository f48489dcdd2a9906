//! Output mode and the summary block.

use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including package manager output.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show minimal output (results and summary only).
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows package manager output.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows results (output blocks, summary).
    pub fn shows_results(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

const SUMMARY_TITLE: &str = "--- Dependency Resolution Summary ---";
const SUMMARY_RULE: &str = "---------------------------------------";

/// Render the plain-text summary block.
pub fn render_summary(installed: &[String]) -> String {
    let mut lines = vec![String::new(), SUMMARY_TITLE.to_string()];
    if installed.is_empty() {
        lines.push("No new packages needed to be installed.".to_string());
    } else {
        lines.push("Successfully installed the following packages:".to_string());
        lines.extend(installed.iter().map(|pkg| format!("  - {}", pkg)));
    }
    lines.push(SUMMARY_RULE.to_string());
    lines.join("\n")
}

/// Render a labelled block of captured output.
pub fn render_output_block(label: &str, content: &str) -> String {
    format!("\n--- {} ---\n{}", label, content)
}
