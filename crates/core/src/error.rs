//! Error types for typeline-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported terminal: {0}")]
    UnsupportedTerminal(String),

    #[error("Undecodable input byte: {0:#04x}")]
    Decode(u8),

    #[error("Failed to restore terminal mode: {0}")]
    Restore(String),

    #[error("Signal handler error: {0}")]
    Signal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(unix)]
impl From<nix::Error> for CoreError {
    fn from(err: nix::Error) -> Self {
        CoreError::UnsupportedTerminal(err.to_string())
    }
}
