//! Console raw mode through crossterm
//!
//! On Windows this clears the line-input and echo flags of the console
//! input handle. Restoration is best-effort.

use crossterm::terminal;
use crossterm::tty::IsTty;
use tracing::debug;

use super::traits::{ModeBackend, Saved, SavedMode};
use crate::error::{CoreError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMode;

impl ModeBackend for ConsoleMode {
    fn name(&self) -> &'static str {
        "console"
    }

    fn enter(&self) -> Result<SavedMode> {
        if !std::io::stdin().is_tty() {
            return Err(CoreError::UnsupportedTerminal(
                "stdin is not a console".into(),
            ));
        }
        terminal::enable_raw_mode().map_err(|e| CoreError::UnsupportedTerminal(e.to_string()))?;
        debug!("console raw mode enabled");
        Ok(SavedMode(Saved::Console))
    }

    fn restore(&self, _saved: &SavedMode) -> Result<()> {
        terminal::disable_raw_mode().map_err(|e| CoreError::Restore(e.to_string()))
    }
}
