//! Keystroke source abstraction

use std::collections::VecDeque;

use async_trait::async_trait;

use super::keystroke::Keystroke;
use crate::error::{CoreError, Result};

/// Supplies keystrokes one at a time
#[async_trait]
pub trait KeySource: Send {
    /// Wait for the next keystroke
    ///
    /// Returns `Ok(None)` once the input is closed.
    async fn next_key(&mut self) -> Result<Option<Keystroke>>;
}

/// Scripted keystroke source for testing
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Result<Keystroke>>,
}

impl ScriptedKeys {
    /// Create from a fixed keystroke sequence
    pub fn new(keys: impl IntoIterator<Item = Keystroke>) -> Self {
        Self {
            keys: keys.into_iter().map(Ok).collect(),
        }
    }

    /// Create from text, one printable (or control) unit per char
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().map(Keystroke::classify))
    }

    /// Append an I/O failure to the script
    pub fn push_error(&mut self, error: CoreError) {
        self.keys.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[async_trait]
impl KeySource for ScriptedKeys {
    async fn next_key(&mut self) -> Result<Option<Keystroke>> {
        self.keys.pop_front().transpose()
    }
}
