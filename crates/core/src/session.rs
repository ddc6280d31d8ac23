//! One interactive session: prompt rendering plus scoped line reads

use std::io::{self, Write};

use tracing::warn;

use crate::config::ReplConfig;
use crate::error::Result;
use crate::input::{KeySource, StdinKeys};
use crate::line::{LineReader, LineResult};
use crate::terminal::TerminalController;
use crate::typewriter::Typewriter;

/// Cloneable handle to the process's stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOut;

impl Write for ConsoleOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Renderer and line reader sharing one terminal controller
pub struct Session<S, W> {
    config: ReplConfig,
    controller: TerminalController,
    typewriter: Typewriter<W>,
    reader: LineReader<S, W>,
}

impl Session<StdinKeys, ConsoleOut> {
    /// Session over the real stdin/stdout with the host's mode backend
    ///
    /// Must be called from within a tokio runtime.
    pub fn stdio(config: ReplConfig) -> Result<Self> {
        let controller = TerminalController::detect();
        if !controller.supports_raw_mode() {
            warn!("Raw mode not available, input is line-buffered and echoed by the terminal");
        }
        let source = StdinKeys::spawn()?;
        Ok(Self::new(config, controller, source, ConsoleOut))
    }
}

impl<S: KeySource, W: Write + Clone> Session<S, W> {
    pub fn new(config: ReplConfig, controller: TerminalController, source: S, out: W) -> Self {
        Self {
            typewriter: Typewriter::new(out.clone(), controller.clone()),
            reader: LineReader::new(source, out),
            controller,
            config,
        }
    }

    pub fn config(&self) -> &ReplConfig {
        &self.config
    }

    /// Render the prompt, then read one line in raw mode
    pub async fn prompt_line(&mut self) -> Result<LineResult> {
        self.typewriter
            .render(&self.config.prompt, self.config.prompt_delay, false)
            .await?;

        let mut handle = self.controller.enter_raw_mode();
        let result = self.reader.read_line().await;
        handle.release()?;
        result
    }

    /// Render informational text at the configured pace
    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.typewriter
            .render(text, self.config.char_delay, true)
            .await
    }

    /// Render help text at the help pace
    pub async fn help(&mut self, text: &str) -> Result<()> {
        self.typewriter
            .render(text, self.config.help_delay, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::input::{Keystroke, ScriptedKeys};
    use crate::terminal::MockBackend;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn instant_config() -> ReplConfig {
        ReplConfig::default()
            .with_char_delay(Duration::ZERO)
            .with_prompt_delay(Duration::ZERO)
    }

    fn session(
        mock: &MockBackend,
        keys: ScriptedKeys,
    ) -> (Session<ScriptedKeys, SharedBuffer>, SharedBuffer) {
        let out = SharedBuffer::default();
        let controller = TerminalController::with_backend(mock.clone());
        (
            Session::new(instant_config(), controller, keys, out.clone()),
            out,
        )
    }

    #[tokio::test]
    async fn test_prompt_then_line() {
        let mock = MockBackend::new();
        let (mut session, out) = session(&mock, ScriptedKeys::from_text("hi\r"));

        let line = session.prompt_line().await.unwrap();
        assert_eq!(line, LineResult::Line("hi".into()));
        assert_eq!(out.contents(), "> \r\nhi\r\n");
        assert!(!mock.is_raw());
        assert_eq!(mock.enter_count(), 2);
        assert_eq!(mock.restore_count(), 2);
    }

    #[tokio::test]
    async fn test_interrupt_then_fresh_line() {
        let mock = MockBackend::new();
        let keys = ScriptedKeys::new([
            Keystroke::Printable('x'),
            Keystroke::Interrupt,
            Keystroke::Printable('y'),
            Keystroke::LineTerminator,
        ]);
        let (mut session, _out) = session(&mock, keys);

        assert_eq!(session.prompt_line().await.unwrap(), LineResult::Interrupted);
        assert!(!mock.is_raw());
        assert_eq!(
            session.prompt_line().await.unwrap(),
            LineResult::Line("y".into())
        );
    }

    #[tokio::test]
    async fn test_closed_input() {
        let mock = MockBackend::new();
        let (mut session, _out) = session(&mock, ScriptedKeys::default());
        assert_eq!(session.prompt_line().await.unwrap(), LineResult::Closed);
        assert!(!mock.is_raw());
    }

    #[tokio::test]
    async fn test_read_error_still_restores() {
        let mock = MockBackend::new();
        let mut keys = ScriptedKeys::default();
        keys.push_error(CoreError::Io(io::Error::new(io::ErrorKind::Other, "boom")));
        let (mut session, _out) = session(&mock, keys);

        assert!(session.prompt_line().await.is_err());
        assert!(!mock.is_raw());
        assert_eq!(mock.enter_count(), mock.restore_count());
    }

    #[tokio::test]
    async fn test_say_uses_typewriter() {
        let mock = MockBackend::unsupported();
        let (mut session, out) = session(&mock, ScriptedKeys::default());
        session.say("done").await.unwrap();
        assert!(out.contents().contains("done"));
        assert!(out.contents().ends_with("\r\n"));
    }
}
