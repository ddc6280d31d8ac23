//! Line reader: accumulates keystrokes into a line with local echo
//!
//! Editing is single-pass. Backspace erases one character column; there
//! is no cursor movement within the line, so arrow-key escape sequences
//! arrive as printable units and are echoed as-is.

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::input::{KeySource, Keystroke};

/// Cursor back, blank the column, cursor back again
pub const ERASE_SEQUENCE: &[u8] = b"\x08 \x08";

/// Line break that also returns the carriage while output processing is off
pub const NEWLINE: &[u8] = b"\r\n";

/// Outcome of one `read_line` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// A terminator was read
    Line(String),
    /// An interrupt arrived; the partial line was discarded
    Interrupted,
    /// Input reached end-of-file with nothing pending
    Closed,
}

/// State after feeding one keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineState {
    Reading,
    Done(String),
    Aborted,
}

/// The line buffer and its transition function
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply one keystroke, echoing to `out`
    ///
    /// `Done` and `Aborted` leave the editor empty and ready for a new line.
    pub fn feed<W: Write>(&mut self, key: Keystroke, out: &mut W) -> Result<LineState> {
        match key {
            Keystroke::Printable(c) => {
                self.buffer.push(c);
                let mut utf8 = [0u8; 4];
                out.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
                out.flush()?;
                Ok(LineState::Reading)
            }
            Keystroke::Backspace => {
                if self.buffer.pop().is_some() {
                    out.write_all(ERASE_SEQUENCE)?;
                    out.flush()?;
                }
                Ok(LineState::Reading)
            }
            Keystroke::LineTerminator => {
                out.write_all(NEWLINE)?;
                out.flush()?;
                Ok(LineState::Done(std::mem::take(&mut self.buffer)))
            }
            Keystroke::Interrupt => {
                self.buffer.clear();
                Ok(LineState::Aborted)
            }
        }
    }
}

/// Reads whole lines from a [`KeySource`], echoing to a writer
pub struct LineReader<S, W> {
    source: S,
    out: W,
}

impl<S: KeySource, W: Write> LineReader<S, W> {
    pub fn new(source: S, out: W) -> Self {
        Self { source, out }
    }

    /// Read one line
    ///
    /// Every call starts from an empty buffer. At end of input a partial
    /// line is still returned as `Line`; `Closed` follows on the next call.
    pub async fn read_line(&mut self) -> Result<LineResult> {
        let mut editor = LineEditor::new();

        loop {
            let Some(key) = self.source.next_key().await? else {
                if editor.buffer().is_empty() {
                    return Ok(LineResult::Closed);
                }
                self.out.write_all(NEWLINE)?;
                self.out.flush()?;
                return Ok(LineResult::Line(editor.buffer().to_owned()));
            };

            match editor.feed(key, &mut self.out)? {
                LineState::Reading => {}
                LineState::Done(line) => {
                    debug!("line complete ({} chars)", line.chars().count());
                    return Ok(LineResult::Line(line));
                }
                LineState::Aborted => {
                    debug!("line aborted by interrupt");
                    return Ok(LineResult::Interrupted);
                }
            }
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}
