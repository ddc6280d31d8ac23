//! POSIX raw mode via termios attributes on stdin

use std::io;
use std::os::fd::AsFd;

use nix::sys::termios::{self, SetArg};
use tracing::debug;

use super::traits::{ModeBackend, Saved, SavedMode};
use crate::error::{CoreError, Result};

/// Saves stdin's termios attributes and applies `cfmakeraw`
///
/// Restoration uses `TCSANOW` so the saved attributes take effect
/// immediately instead of after pending output drains.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixTermios;

impl ModeBackend for PosixTermios {
    fn name(&self) -> &'static str {
        "posix-termios"
    }

    fn enter(&self) -> Result<SavedMode> {
        let stdin = io::stdin();
        let saved = termios::tcgetattr(stdin.as_fd())?;

        let mut raw = saved.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &raw)?;

        debug!("termios raw mode applied");
        Ok(SavedMode(Saved::Termios(saved)))
    }

    fn restore(&self, saved: &SavedMode) -> Result<()> {
        let Saved::Termios(attrs) = &saved.0 else {
            return Err(CoreError::Restore("saved mode is not termios".into()));
        };
        termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSANOW, attrs)
            .map_err(|e| CoreError::Restore(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::IsTerminal;

    fn snapshot() -> termios::Termios {
        termios::tcgetattr(io::stdin().as_fd()).unwrap()
    }

    fn same_attrs(a: &termios::Termios, b: &termios::Termios) -> bool {
        a.input_flags == b.input_flags
            && a.output_flags == b.output_flags
            && a.control_flags == b.control_flags
            && a.local_flags == b.local_flags
            && a.control_chars == b.control_chars
    }

    #[test]
    fn test_enter_fails_cleanly_without_tty() {
        if io::stdin().is_terminal() {
            return;
        }
        let result = PosixTermios.enter();
        assert!(matches!(result, Err(CoreError::UnsupportedTerminal(_))));
    }

    #[test]
    fn test_round_trip_leaves_attributes_identical() {
        if !io::stdin().is_terminal() {
            return;
        }
        let before = snapshot();
        let saved = PosixTermios.enter().unwrap();
        let during = snapshot();
        assert!(!during.local_flags.contains(termios::LocalFlags::ECHO));
        assert!(!during.local_flags.contains(termios::LocalFlags::ICANON));
        PosixTermios.restore(&saved).unwrap();
        assert!(same_attrs(&before, &snapshot()));
    }

    #[test]
    fn test_restore_rejects_foreign_mode() {
        let result = PosixTermios.restore(&SavedMode(Saved::Mock));
        assert!(matches!(result, Err(CoreError::Restore(_))));
    }
}
