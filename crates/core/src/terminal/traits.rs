//! Terminal mode backend trait

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{CoreError, Result};

/// Terminal configuration captured before entering raw mode
///
/// Opaque to callers; only the backend that produced it can apply it.
#[derive(Debug, Clone)]
pub struct SavedMode(pub(crate) Saved);

#[derive(Debug, Clone)]
pub(crate) enum Saved {
    #[cfg(unix)]
    Termios(nix::sys::termios::Termios),
    Console,
    Mock,
}

/// Platform capability for switching the controlling terminal into raw mode
pub trait ModeBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Save the current configuration and switch to raw mode
    ///
    /// Returns `UnsupportedTerminal` when the device cannot be queried or
    /// configured (not a tty, console API unavailable).
    fn enter(&self) -> Result<SavedMode>;

    /// Re-apply a configuration captured by `enter`
    fn restore(&self, saved: &SavedMode) -> Result<()>;
}

/// Mock backend for testing
///
/// Clones share state, so a test can keep one clone for assertions while
/// the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    unsupported: AtomicBool,
    fail_restore: AtomicBool,
    raw: AtomicBool,
    enters: AtomicUsize,
    restores: AtomicUsize,
}

impl MockBackend {
    /// Create a mock device that supports raw mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock device that rejects mode queries (like a redirected file)
    pub fn unsupported() -> Self {
        let mock = Self::default();
        mock.inner.unsupported.store(true, Ordering::SeqCst);
        mock
    }

    /// Create a mock device whose restore always fails
    pub fn failing_restore() -> Self {
        let mock = Self::default();
        mock.inner.fail_restore.store(true, Ordering::SeqCst);
        mock
    }

    /// Whether the mock device is currently in raw mode
    pub fn is_raw(&self) -> bool {
        self.inner.raw.load(Ordering::SeqCst)
    }

    /// Number of successful `enter` calls
    pub fn enter_count(&self) -> usize {
        self.inner.enters.load(Ordering::SeqCst)
    }

    /// Number of `restore` calls
    pub fn restore_count(&self) -> usize {
        self.inner.restores.load(Ordering::SeqCst)
    }
}

impl ModeBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn enter(&self) -> Result<SavedMode> {
        if self.inner.unsupported.load(Ordering::SeqCst) {
            return Err(CoreError::UnsupportedTerminal(
                "mock device is not a tty".into(),
            ));
        }
        self.inner.raw.store(true, Ordering::SeqCst);
        self.inner.enters.fetch_add(1, Ordering::SeqCst);
        Ok(SavedMode(Saved::Mock))
    }

    fn restore(&self, saved: &SavedMode) -> Result<()> {
        self.inner.restores.fetch_add(1, Ordering::SeqCst);
        if !matches!(saved.0, Saved::Mock) {
            return Err(CoreError::Restore("foreign saved mode".into()));
        }
        if self.inner.fail_restore.load(Ordering::SeqCst) {
            return Err(CoreError::Restore("mock restore failure".into()));
        }
        self.inner.raw.store(false, Ordering::SeqCst);
        Ok(())
    }
}
