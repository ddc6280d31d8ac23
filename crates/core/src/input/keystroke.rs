//! Keystroke classification and incremental UTF-8 decoding

use tracing::debug;

use crate::error::CoreError;

/// One classified unit of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Printable(char),
    Backspace,
    LineTerminator,
    Interrupt,
}

impl Keystroke {
    /// Classify a decoded character
    ///
    /// DEL (POSIX terminals) and BS (Windows consoles) are both backspace.
    /// ETX is Ctrl+C delivered as a byte while signals are disabled.
    pub fn classify(c: char) -> Self {
        match c {
            '\r' | '\n' => Keystroke::LineTerminator,
            '\u{7f}' | '\u{8}' => Keystroke::Backspace,
            '\u{3}' => Keystroke::Interrupt,
            c => Keystroke::Printable(c),
        }
    }
}

/// Turns a raw byte stream into keystrokes
///
/// Multi-byte UTF-8 sequences are buffered until complete. Malformed
/// sequences are dropped and decoding continues with the next byte. A LF
/// directly after a CR in the same chunk is swallowed so CRLF yields a
/// single terminator; call [`KeyDecoder::end_chunk`] between reads.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
    expected: usize,
    after_cr: bool,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the end of one read, so a LF in the next read is not folded
    /// into a CR from this one
    pub fn end_chunk(&mut self) {
        self.after_cr = false;
    }

    /// Feed one byte, returning a keystroke once a full unit is available
    pub fn push(&mut self, byte: u8) -> Option<Keystroke> {
        match self.decode(byte) {
            Ok(Some(c)) => {
                let swallow = c == '\n' && self.after_cr;
                self.after_cr = c == '\r';
                if swallow {
                    return None;
                }
                Some(Keystroke::classify(c))
            }
            Ok(None) => None,
            Err(e) => {
                debug!("dropping input unit: {}", e);
                self.after_cr = false;
                None
            }
        }
    }

    fn decode(&mut self, byte: u8) -> Result<Option<char>, CoreError> {
        if self.pending.is_empty() {
            return match byte {
                0x00..=0x7f => Ok(Some(byte as char)),
                _ => self.start_sequence(byte),
            };
        }

        if byte & 0b1100_0000 != 0b1000_0000 {
            // Sequence cut short; restart with the new byte
            self.pending.clear();
            return self.decode(byte);
        }

        self.pending.push(byte);
        if self.pending.len() < self.expected {
            return Ok(None);
        }

        let bytes = std::mem::take(&mut self.pending);
        std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(CoreError::Decode(bytes[0]))
    }

    fn start_sequence(&mut self, lead: u8) -> Result<Option<char>, CoreError> {
        self.expected = match lead {
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Err(CoreError::Decode(lead)),
        };
        self.pending.push(lead);
        Ok(None)
    }
}
