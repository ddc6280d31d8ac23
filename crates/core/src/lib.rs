//! Typeline Core - interactive line reading with a typewriter effect
//!
//! This crate provides:
//! - Scoped raw-mode control of the terminal (POSIX termios, console API)
//! - Keystroke decoding from stdin with interrupt delivery
//! - A single-line editor with destructive backspace
//! - Paced character-at-a-time output
//! - Error types

pub mod config;
pub mod error;
pub mod input;
pub mod line;
pub mod session;
pub mod terminal;
pub mod typewriter;

// Re-export common types
pub use config::ReplConfig;
pub use error::{CoreError, Result};
pub use input::{KeySource, Keystroke, ScriptedKeys, StdinKeys};
pub use line::{LineReader, LineResult};
pub use session::{ConsoleOut, Session};
pub use terminal::{MockBackend, ModeBackend, TerminalController, TerminalModeHandle};
pub use typewriter::Typewriter;
