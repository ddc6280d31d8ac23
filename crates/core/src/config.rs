//! REPL configuration

use std::time::Duration;

/// Default prompt shown before each line
pub const DEFAULT_PROMPT: &str = "> ";

/// Per-character delay for informational text
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(100);

/// Per-character delay for the prompt
pub const DEFAULT_PROMPT_DELAY: Duration = Duration::from_millis(10);

/// Per-character delay for help text
pub const DEFAULT_HELP_DELAY: Duration = Duration::from_millis(20);

/// Read loop configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Prompt rendered before each line
    pub prompt: String,

    /// Pacing of the prompt render
    pub prompt_delay: Duration,

    /// Pacing of informational output
    pub char_delay: Duration,

    /// Pacing of help text
    pub help_delay: Duration,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            prompt_delay: DEFAULT_PROMPT_DELAY,
            char_delay: DEFAULT_CHAR_DELAY,
            help_delay: DEFAULT_HELP_DELAY,
        }
    }
}

impl ReplConfig {
    /// Set custom prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set output pacing
    pub fn with_char_delay(mut self, delay: Duration) -> Self {
        self.char_delay = delay;
        self
    }

    /// Set prompt pacing
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplConfig::default();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.prompt_delay, Duration::from_millis(10));
        assert_eq!(config.char_delay, Duration::from_millis(100));
        assert!(config.prompt_delay < config.char_delay);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ReplConfig::default()
            .with_prompt("$ ")
            .with_char_delay(Duration::ZERO)
            .with_prompt_delay(Duration::from_millis(1));
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.char_delay, Duration::ZERO);
        assert_eq!(config.prompt_delay, Duration::from_millis(1));
        assert_eq!(config.help_delay, DEFAULT_HELP_DELAY);
    }
}
