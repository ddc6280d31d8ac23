//! Terminal mode controller
//!
//! Scoped raw-mode acquisition over a platform [`ModeBackend`]. The
//! [`TerminalModeHandle`] restores the saved configuration when it is
//! released or dropped, including during panic unwinding.

mod console;
#[cfg(unix)]
mod posix;
mod traits;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::Result;

pub use console::ConsoleMode;
#[cfg(unix)]
pub use posix::PosixTermios;
pub use traits::{MockBackend, ModeBackend, SavedMode};

/// Hands out raw-mode handles for one terminal device
///
/// Not reentrant: while a handle is live, further `enter_raw_mode` calls
/// return a pass-through handle. Clones share the same device state.
#[derive(Clone)]
pub struct TerminalController {
    backend: Arc<dyn ModeBackend>,
    active: Arc<AtomicBool>,
}

impl TerminalController {
    /// Select the backend for the host platform
    #[cfg(unix)]
    pub fn detect() -> Self {
        Self::with_backend(PosixTermios)
    }

    /// Select the backend for the host platform
    #[cfg(not(unix))]
    pub fn detect() -> Self {
        Self::with_backend(ConsoleMode)
    }

    /// Create a controller over a specific backend
    pub fn with_backend(backend: impl ModeBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether a raw-mode handle is currently live
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Enter raw mode for the lifetime of the returned handle
    ///
    /// Never fails: an unsupported device yields a pass-through handle whose
    /// release is a no-op.
    pub fn enter_raw_mode(&self) -> TerminalModeHandle {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("raw mode already held, nested scope is pass-through");
            return TerminalModeHandle::pass_through();
        }

        match self.backend.enter() {
            Ok(saved) => TerminalModeHandle {
                session: Some(RawSession {
                    backend: Arc::clone(&self.backend),
                    saved,
                    active: Arc::clone(&self.active),
                }),
            },
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                debug!("{} backend unavailable, pass-through input: {}", self.backend.name(), e);
                TerminalModeHandle::pass_through()
            }
        }
    }

    /// Check once whether the device can enter raw mode at all
    pub fn supports_raw_mode(&self) -> bool {
        let mut handle = self.enter_raw_mode();
        let supported = handle.is_raw();
        if let Err(e) = handle.release() {
            error!("Failed to restore terminal after probe: {}", e);
        }
        supported
    }
}

struct RawSession {
    backend: Arc<dyn ModeBackend>,
    saved: SavedMode,
    active: Arc<AtomicBool>,
}

/// A live raw-mode session, or a pass-through marker
///
/// Restoration is owed exactly once; `release` after the first call and
/// `Drop` after `release` are no-ops.
#[must_use = "raw mode is restored as soon as the handle is dropped"]
pub struct TerminalModeHandle {
    session: Option<RawSession>,
}

impl TerminalModeHandle {
    fn pass_through() -> Self {
        Self { session: None }
    }

    /// Whether this handle actually switched the device into raw mode
    pub fn is_raw(&self) -> bool {
        self.session.is_some()
    }

    /// Restore the saved terminal configuration now
    pub fn release(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        session.active.store(false, Ordering::SeqCst);
        session.backend.restore(&session.saved)?;
        debug!("{} mode restored", session.backend.name());
        Ok(())
    }
}

impl Drop for TerminalModeHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!("Failed to restore terminal mode: {}", e);
        }
    }
}
