//! Child-process session on a pseudo-terminal
//!
//! The server runs on the slave side of a pty, so it sees a terminal on
//! stdin, stdout and stderr. A reader thread forwards everything written to
//! the master side into one output stream that prompts are matched against.

use super::session::{ExpectOutcome, InteractiveSession, SessionError};
use portable_pty::{Child, ChildKiller, CommandBuilder, ExitStatus, MasterPty, PtySize};
use regex_lite::Regex;
use std::io::{ErrorKind, Read, Write};
use std::ops::Range;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::debug;

/// How long `is_alive` and `terminate` wait for a process to be reaped.
const EXIT_GRACE: Duration = Duration::from_secs(1);
const EXIT_POLL: Duration = Duration::from_millis(20);

const READ_CHUNK_SIZE: usize = 4096;

const PTY_SIZE: PtySize = PtySize {
    rows: 24,
    cols: 80,
    pixel_width: 0,
    pixel_height: 0,
};

pub struct ProcessSession {
    child: Box<dyn Child + Send + Sync>,
    // Dropping the master hangs up the terminal.
    _master: Box<dyn MasterPty + Send>,
    writer: Option<Box<dyn Write + Send>>,
    output: mpsc::UnboundedReceiver<String>,
    buffer: String,
    closed: bool,
    exit_status: Option<ExitStatus>,
    killed: bool,
    default_timeout: Duration,
}

impl ProcessSession {
    /// Spawn `program` with `args` on a new pseudo-terminal
    ///
    /// The child inherits the environment and working directory. A program
    /// that cannot be found on `PATH` is reported as [`SessionError::NotFound`].
    pub fn spawn(
        program: &str,
        args: &[String],
        default_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let path =
            which::which(program).map_err(|_| SessionError::NotFound(program.to_string()))?;

        let pair = portable_pty::native_pty_system()
            .openpty(PTY_SIZE)
            .map_err(pty_error)?;

        let mut command = CommandBuilder::new(path);
        command.args(args);
        if let Ok(cwd) = std::env::current_dir() {
            command.cwd(cwd);
        }

        let child = pair.slave.spawn_command(command).map_err(pty_error)?;
        drop(pair.slave);

        let reader = pair.master.try_clone_reader().map_err(pty_error)?;
        let writer = pair.master.take_writer().map_err(pty_error)?;

        let (tx, output) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("pty-reader".to_string())
            .spawn(move || forward_output(reader, tx))?;

        Ok(Self {
            child,
            _master: pair.master,
            writer: Some(writer),
            output,
            buffer: String::new(),
            closed: false,
            exit_status: None,
            killed: false,
            default_timeout,
        })
    }

    /// Reap the child if it has exited.
    fn poll_exit(&mut self) -> bool {
        if self.exit_status.is_some() {
            return true;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit_status = Some(status);
                true
            }
            Ok(None) => false,
            Err(_) => true,
        }
    }

    async fn wait_exit(&mut self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;
        loop {
            if self.poll_exit() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(EXIT_POLL).await;
        }
    }
}

impl InteractiveSession for ProcessSession {
    async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        let writer = self.writer.as_mut().ok_or(SessionError::Eof)?;
        let payload = format!("{line}\n");
        writer
            .write_all(payload.as_bytes())
            .map_err(map_write_error)?;
        writer.flush().map_err(map_write_error)
    }

    async fn expect(
        &mut self,
        patterns: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<ExpectOutcome, SessionError> {
        let deadline = Instant::now() + timeout.unwrap_or(self.default_timeout);
        loop {
            if let Some((index, range)) = earliest_match(&self.buffer, patterns) {
                let text = self.buffer[range.clone()].to_string();
                self.buffer.drain(..range.end);
                return Ok(ExpectOutcome::Matched { index, text });
            }
            if self.closed {
                return Ok(ExpectOutcome::Eof);
            }
            match timeout_at(deadline, self.output.recv()).await {
                Ok(Some(chunk)) => {
                    echo_chunk(&chunk);
                    self.buffer.push_str(&chunk);
                }
                Ok(None) => self.closed = true,
                Err(_) => return Ok(ExpectOutcome::Timeout),
            }
        }
    }

    /// Output read here is echoed at debug level and then dropped.
    async fn wait_eof(&mut self) -> Result<(), SessionError> {
        self.buffer.clear();
        while let Some(chunk) = self.output.recv().await {
            echo_chunk(&chunk);
        }
        self.closed = true;
        Ok(())
    }

    async fn is_alive(&mut self) -> bool {
        if self.closed {
            return !self.wait_exit(EXIT_GRACE).await;
        }
        !self.poll_exit()
    }

    /// `None` after [`terminate`](Self::terminate) killed the process.
    fn exit_code(&self) -> Option<i32> {
        if self.killed {
            return None;
        }
        self.exit_status
            .as_ref()
            .map(|status| status.exit_code() as i32)
    }

    async fn terminate(&mut self) -> Result<(), SessionError> {
        self.writer = None;
        if self.poll_exit() {
            return Ok(());
        }
        self.child.kill()?;
        self.killed = true;
        self.wait_exit(EXIT_GRACE).await;
        Ok(())
    }
}

impl Drop for ProcessSession {
    fn drop(&mut self) {
        if !self.poll_exit() {
            let _ = self.child.kill();
        }
    }
}

fn forward_output(mut reader: Box<dyn Read + Send>, tx: mpsc::UnboundedSender<String>) {
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(chunk).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            // Linux reports EIO once the slave side is closed.
            Err(_) => break,
        }
    }
}

fn echo_chunk(chunk: &str) {
    debug!("{}", chunk.trim_end());
}

fn pty_error(e: impl std::fmt::Display) -> SessionError {
    SessionError::Pty(e.to_string())
}

fn map_write_error(e: std::io::Error) -> SessionError {
    match e.kind() {
        ErrorKind::BrokenPipe => SessionError::Eof,
        _ => SessionError::Io(e),
    }
}

/// Earliest match in `buffer`; ties go to the lower pattern index.
fn earliest_match(buffer: &str, patterns: &[Regex]) -> Option<(usize, Range<usize>)> {
    patterns
        .iter()
        .enumerate()
        .filter_map(|(index, pattern)| pattern.find(buffer).map(|m| (index, m.start()..m.end())))
        .min_by_key(|(index, range)| (range.start, *index))
}
