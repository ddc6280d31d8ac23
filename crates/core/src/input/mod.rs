//! Character-read primitive: keystroke sources and classification

mod keystroke;
mod source;
mod stdin;

pub use keystroke::{KeyDecoder, Keystroke};
pub use source::{KeySource, ScriptedKeys};
pub use stdin::{InterruptWatcher, StdinKeys};
