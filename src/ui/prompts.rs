//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{DepguessError, Result};

use super::Prompt;

/// Convert dialoguer errors, keeping Ctrl-C distinct from I/O failure.
fn map_dialoguer_err(e: dialoguer::Error) -> DepguessError {
    let io: std::io::Error = e.into();
    if io.kind() == std::io::ErrorKind::Interrupted {
        DepguessError::Cancelled
    } else {
        DepguessError::Io(io)
    }
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Ask a yes/no question on `term`.
///
/// Escape counts as "no". Ctrl-C yields [`DepguessError::Cancelled`].
pub fn confirm_on(prompt: &Prompt, term: &Term) -> Result<bool> {
    let answer = Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on_opt(term)
        .map_err(map_dialoguer_err)?;

    Ok(answer.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn interrupted_maps_to_cancelled() {
        let err = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
        assert!(map_dialoguer_err(err).is_cancelled());
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err = dialoguer::Error::IO(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(matches!(map_dialoguer_err(err), DepguessError::Io(_)));
    }
}
