//! Interactive session capability
//!
//! The launcher talks to the server through this trait only, so the prompt
//! loop can run against a scripted session in tests.

use regex_lite::Regex;
use std::time::Duration;

/// Result of waiting for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectOutcome {
    /// A pattern matched; `index` is its position in the pattern list and
    /// `text` the matched output.
    Matched { index: usize, text: String },
    /// The output stream closed before any pattern matched.
    Eof,
    /// Nothing matched within the timeout.
    Timeout,
}

/// Errors raised by a session
///
/// `Eof` and `Timeout` mirror the outcomes of the same name for sessions that
/// report them as failures rather than results.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} command not found")]
    NotFound(String),

    #[error("End of output stream")]
    Eof,

    #[error("Timed out waiting for output")]
    Timeout,

    #[error("Failed to open terminal: {0}")]
    Pty(String),

    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal terminal-like control over a child process
///
/// Futures need not be `Send`; sessions are driven on a current-thread runtime.
#[allow(async_fn_in_trait)]
pub trait InteractiveSession {
    /// Write `line` followed by a newline to the process input.
    async fn send_line(&mut self, line: &str) -> Result<(), SessionError>;

    /// Wait until one of `patterns` matches the process output.
    ///
    /// `None` uses the session's default timeout. Output up to the end of the
    /// match is consumed.
    async fn expect(
        &mut self,
        patterns: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<ExpectOutcome, SessionError>;

    /// Wait without bound until the output stream closes.
    async fn wait_eof(&mut self) -> Result<(), SessionError>;

    /// Whether the process is still running.
    async fn is_alive(&mut self) -> bool;

    /// Exit code once the process has exited; `None` while running or when
    /// killed by a signal.
    fn exit_code(&self) -> Option<i32>;

    /// Stop the process.
    async fn terminate(&mut self) -> Result<(), SessionError>;
}
