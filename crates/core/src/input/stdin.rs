//! Keystrokes from the process's standard input
//!
//! A detached thread performs blocking reads on stdin and forwards byte
//! chunks through a channel. `next_key` selects between that channel and
//! OS interrupt signals, so a Ctrl+C in pass-through mode (where the
//! terminal raises SIGINT instead of sending 0x03) still surfaces as
//! [`Keystroke::Interrupt`].

use std::collections::VecDeque;
use std::io::{self, Read};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::keystroke::{KeyDecoder, Keystroke};
use super::source::KeySource;
use crate::error::{CoreError, Result};

const READ_CHUNK: usize = 1024;
const CHANNEL_CAPACITY: usize = 32;

/// Forwards OS interrupt signals (SIGINT, console Ctrl+C) into a channel
pub struct InterruptWatcher {
    rx: mpsc::Receiver<()>,
}

impl InterruptWatcher {
    /// Register for interrupt signals
    ///
    /// Must be called from within a tokio runtime. While registered, an
    /// interrupt no longer terminates the process.
    pub fn install() -> Result<Self> {
        let (tx, rx) = mpsc::channel(8);
        spawn_signal_forwarder(tx)?;
        Ok(Self { rx })
    }

    /// Create a watcher fed by the returned sender instead of OS signals
    pub fn manual() -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(8);
        (tx, Self { rx })
    }

    async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

#[cfg(unix)]
fn spawn_signal_forwarder(tx: mpsc::Sender<()>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut stream =
        signal(SignalKind::interrupt()).map_err(|e| CoreError::Signal(e.to_string()))?;
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            debug!("SIGINT received");
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(windows)]
fn spawn_signal_forwarder(tx: mpsc::Sender<()>) -> Result<()> {
    let mut stream =
        tokio::signal::windows::ctrl_c().map_err(|e| CoreError::Signal(e.to_string()))?;
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            debug!("Ctrl+C received");
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    Ok(())
}

/// Keystrokes decoded from a byte channel, normally fed by stdin
pub struct StdinKeys {
    bytes: mpsc::Receiver<io::Result<Vec<u8>>>,
    interrupts: InterruptWatcher,
    decoder: KeyDecoder,
    pending: VecDeque<Keystroke>,
}

impl StdinKeys {
    /// Start the stdin reader thread and the interrupt watcher
    pub fn spawn() -> Result<Self> {
        let interrupts = InterruptWatcher::install()?;
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        // Detached: a blocking stdin read cannot be cancelled, and the
        // thread must not keep the process alive on exit.
        std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_stdin(tx))?;

        Ok(Self::from_channel(rx, interrupts))
    }

    /// Decode keystrokes from an existing byte channel
    pub fn from_channel(
        bytes: mpsc::Receiver<io::Result<Vec<u8>>>,
        interrupts: InterruptWatcher,
    ) -> Self {
        Self {
            bytes,
            interrupts,
            decoder: KeyDecoder::new(),
            pending: VecDeque::new(),
        }
    }
}

fn read_stdin(tx: mpsc::Sender<io::Result<Vec<u8>>>) {
    let mut stdin = io::stdin();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.blocking_send(Ok(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                if tx.blocking_send(Err(e)).is_err() {
                    debug!("stdin read error dropped, receiver gone");
                }
                break;
            }
        }
    }
    debug!("stdin reader finished");
}

#[async_trait]
impl KeySource for StdinKeys {
    async fn next_key(&mut self) -> Result<Option<Keystroke>> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }

            tokio::select! {
                biased;
                Some(()) = self.interrupts.recv() => {
                    return Ok(Some(Keystroke::Interrupt));
                }
                chunk = self.bytes.recv() => match chunk {
                    Some(Ok(data)) => {
                        for byte in data {
                            if let Some(key) = self.decoder.push(byte) {
                                self.pending.push_back(key);
                            }
                        }
                        self.decoder.end_chunk();
                    }
                    Some(Err(e)) => return Err(CoreError::Io(e)),
                    None => return Ok(None),
                },
            }
        }
    }
}
