//! Typewriter renderer: paced, character-at-a-time output

use std::io::Write;
use std::time::Duration;

use crossterm::{cursor, queue};

use crate::error::Result;
use crate::line::NEWLINE;
use crate::terminal::TerminalController;

/// Writes text one character at a time inside a raw-mode scope
pub struct Typewriter<W> {
    out: W,
    controller: TerminalController,
}

impl<W: Write> Typewriter<W> {
    pub fn new(out: W, controller: TerminalController) -> Self {
        Self { out, controller }
    }

    /// Render `text` with `delay` after each character, then a newline
    ///
    /// With `hide_echo` the cursor is hidden for the duration of the render.
    /// The raw-mode scope keeps type-ahead from being echoed mid-render and
    /// is released before the trailing newline.
    pub async fn render(&mut self, text: &str, delay: Duration, hide_echo: bool) -> Result<()> {
        let mut handle = self.controller.enter_raw_mode();

        if hide_echo {
            queue!(self.out, cursor::Hide)?;
        }
        let typed = self.type_out(text, delay).await;
        let shown = if hide_echo {
            queue!(self.out, cursor::Show).and_then(|_| self.out.flush())
        } else {
            Ok(())
        };
        let released = handle.release();

        typed?;
        shown?;
        released?;

        self.out.write_all(NEWLINE)?;
        self.out.flush()?;
        Ok(())
    }

    async fn type_out(&mut self, text: &str, delay: Duration) -> Result<()> {
        let mut utf8 = [0u8; 4];
        for c in text.chars() {
            if c == '\n' {
                self.out.write_all(NEWLINE)?;
            } else {
                self.out.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
            }
            self.out.flush()?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}
