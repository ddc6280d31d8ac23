//! Typeline interactive prompt
//! Features: raw-mode line editing, typewriter output, Ctrl+C recovery

use std::io::{self, Write};
use std::ops::ControlFlow;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use typeline_core::config::{DEFAULT_CHAR_DELAY, DEFAULT_PROMPT, DEFAULT_PROMPT_DELAY};
use typeline_core::{CoreError, KeySource, LineResult, ReplConfig, Session};

const INTERRUPT_HINT: &str = "\nUse exit or quit to leave";

const HELP_TEXT: &str = "\
Interactive features:
  - input is echoed as you type
  - backspace deletes the last character
  - Ctrl+C discards the current line
  - type exit or quit to leave";

/// Typeline - a line-at-a-time prompt with a typewriter effect
#[derive(Parser, Debug)]
#[command(name = "typeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive prompt with typewriter-style output", long_about = None)]
struct Args {
    /// Prompt shown before each line
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Delay between characters of output, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CHAR_DELAY.as_millis() as u64)]
    char_delay_ms: u64,

    /// Delay between characters of the prompt, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PROMPT_DELAY.as_millis() as u64)]
    prompt_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ReplConfig {
        ReplConfig::default()
            .with_prompt(self.prompt.clone())
            .with_char_delay(std::time::Duration::from_millis(self.char_delay_ms))
            .with_prompt_delay(std::time::Duration::from_millis(self.prompt_delay_ms))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with typewriter output
    setup_logging(&args.log_level)?;

    info!("Starting typeline v{}", env!("CARGO_PKG_VERSION"));

    let mut session = Session::stdio(args.config()).context("Failed to open terminal session")?;
    run(&mut session, &mut io::stderr()).await;

    info!("Session ended");
    Ok(())
}

/// Consecutive failed iterations after which the loop gives up
const MAX_CONSECUTIVE_FAILURES: usize = 5;

/// Read-render loop; returns when the user exits or input closes
///
/// Failures are reported to `errors` and the loop continues, unless the
/// terminal could not be restored or output is gone for good.
async fn run<S, W, E>(session: &mut Session<S, W>, errors: &mut E)
where
    S: KeySource,
    W: Write + Clone,
    E: Write,
{
    let mut failures = 0;

    loop {
        let outcome = match session.prompt_line().await {
            Ok(LineResult::Line(line)) if is_exit(&line) => break,
            Ok(LineResult::Line(line)) if line.trim().eq_ignore_ascii_case("help") => {
                session.help(HELP_TEXT).await
            }
            Ok(LineResult::Line(line)) => session.say(&format!("You entered: {}", line)).await,
            Ok(LineResult::Interrupted) => session.say(INTERRUPT_HINT).await,
            Ok(LineResult::Closed) => break,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => failures = 0,
            Err(e) => {
                failures += 1;
                if report(e, errors).is_break() {
                    break;
                }
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    error!("{} consecutive failures, giving up", failures);
                    let _ = writeln!(errors, "\r\nToo many errors. Exiting.");
                    break;
                }
            }
        }
    }
}

/// Report a failure to the user
///
/// A failed terminal restore or a closed output ends the loop.
fn report<E: Write>(err: CoreError, errors: &mut E) -> ControlFlow<()> {
    if is_fatal(&err) {
        error!("{}", err);
        let _ = writeln!(errors, "\r\n{}. Exiting.", err);
        return ControlFlow::Break(());
    }
    warn!("{}", err);
    let _ = writeln!(errors, "\r\nError: {}", err);
    ControlFlow::Continue(())
}

fn is_fatal(err: &CoreError) -> bool {
    match err {
        CoreError::Restore(_) => true,
        CoreError::Io(e) => matches!(
            e.kind(),
            io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero | io::ErrorKind::NotConnected
        ),
        _ => false,
    }
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

fn setup_logging(level: &str) -> Result<()> {
    let log_level = level.parse::<Level>().unwrap_or(Level::WARN);

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
