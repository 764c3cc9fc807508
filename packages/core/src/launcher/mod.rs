//! Remote code server launcher
//!
//! Starts `code-server serve` and walks it through its first-run dialog:
//! - answers the machine-name prompt with the pod identifier
//! - gives up quietly on an access-token prompt
//! - fails on an `Error:` line
//! - treats a closed stream or a quiet period as the end of setup
//!
//! Once setup is over the launcher stays attached until the server's output
//! closes or the user interrupts.

mod health;
mod process;
mod prompt;
mod session;

pub use health::{HealthError, check_health};
pub use process::ProcessSession;
pub use prompt::{FinishReason, LoopStep, PromptPatterns, PromptSignal};
pub use session::{ExpectOutcome, InteractiveSession, SessionError};

use crate::config::defaults::HEALTH_GRACE;
use crate::config::{ConfigError, LauncherConfig};
use std::future::Future;
use tracing::{error, info, warn};

/// How a successful launch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSuccess {
    /// The server ran until its output closed.
    Served,
    /// The user interrupted; the server was terminated.
    Interrupted,
    /// The server exited cleanly during setup.
    Exited,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("{0} command not found. Is VS Code Server installed?")]
    BinaryNotFound(String),

    #[error("VS Code Server reported an error: {0}")]
    ServerError(String),

    #[error("VS Code Server exited with code: {}", format_exit_code(.0))]
    Exited(Option<i32>),

    #[error("Failed to launch VS Code Server: {0}")]
    Session(SessionError),

    #[error("Invalid prompt pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

impl From<SessionError> for LaunchError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(binary) => LaunchError::BinaryNotFound(binary),
            other => LaunchError::Session(other),
        }
    }
}

fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

pub struct Launcher {
    config: LauncherConfig,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        info!("Initializing VS Code Server for pod: {}", config.pod_id);
        Self { config }
    }

    /// Build a launcher from the environment
    ///
    /// Fails before anything is spawned when the pod identifier is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        LauncherConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Spawn the server and drive it, stopping on Ctrl+C
    pub async fn launch(&self) -> bool {
        info!("Starting VS Code Server...");
        let mut session = match ProcessSession::spawn(
            &self.config.binary,
            &self.config.args,
            self.config.startup_timeout,
        ) {
            Ok(session) => session,
            Err(e) => {
                error!("{}", LaunchError::from(e));
                return false;
            }
        };
        info!("VS Code Server process started, waiting for prompts...");
        self.launch_session(&mut session, interrupted()).await
    }

    /// Drive an already spawned session and log the outcome
    pub async fn launch_session<S, F>(&self, session: &mut S, shutdown: F) -> bool
    where
        S: InteractiveSession,
        F: Future<Output = ()>,
    {
        match self.drive(session, shutdown).await {
            Ok(LaunchSuccess::Interrupted) => {
                info!("VS Code Server stopped after interrupt");
                true
            }
            Ok(_) => true,
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    /// Prompt loop followed by the serving wait
    ///
    /// `shutdown` resolving at any point terminates the server and counts as
    /// success.
    pub async fn drive<S, F>(&self, session: &mut S, shutdown: F) -> Result<LaunchSuccess, LaunchError>
    where
        S: InteractiveSession,
        F: Future<Output = ()>,
    {
        let patterns = PromptPatterns::new()?;
        tokio::pin!(shutdown);

        loop {
            let waited = tokio::select! {
                _ = &mut shutdown => None,
                result = session.expect(patterns.as_slice(), Some(self.config.prompt_timeout)) => Some(result),
            };
            let Some(result) = waited else {
                return self.shut_down(session).await;
            };

            match PromptSignal::classify(result)?.step() {
                LoopStep::AnswerMachineName => {
                    info!(
                        "Responding to machine name prompt with: {}",
                        self.config.pod_id
                    );
                    session.send_line(&self.config.pod_id).await?;
                }
                LoopStep::Finish(FinishReason::TokenRequested) => {
                    warn!("Access token required - this might indicate authentication issues");
                    break;
                }
                LoopStep::Finish(FinishReason::StreamClosed) => {
                    info!("VS Code Server process ended");
                    break;
                }
                LoopStep::Finish(FinishReason::NoMorePrompts) => {
                    info!("No more prompts expected, VS Code Server should be running");
                    break;
                }
                LoopStep::Fail(detail) => return Err(LaunchError::ServerError(detail)),
            }
        }

        if !session.is_alive().await {
            return match session.exit_code() {
                Some(0) => {
                    info!("VS Code Server exited with code: 0");
                    Ok(LaunchSuccess::Exited)
                }
                code => Err(LaunchError::Exited(code)),
            };
        }

        info!("VS Code Server is running successfully");
        let ended = tokio::select! {
            _ = &mut shutdown => false,
            result = session.wait_eof() => match result {
                Ok(()) | Err(SessionError::Eof) => true,
                Err(e) => return Err(e.into()),
            },
        };
        if !ended {
            return self.shut_down(session).await;
        }
        info!("VS Code Server output closed");
        Ok(LaunchSuccess::Served)
    }

    async fn shut_down<S: InteractiveSession>(
        &self,
        session: &mut S,
    ) -> Result<LaunchSuccess, LaunchError> {
        info!("Received interrupt signal, shutting down...");
        session.terminate().await?;
        Ok(LaunchSuccess::Interrupted)
    }

    /// Probe the health endpoint after a short grace period
    ///
    /// Logs the result; callers never fail on it.
    pub async fn health_check(&self) -> bool {
        tokio::time::sleep(HEALTH_GRACE).await;
        match check_health(&self.config.health_url, self.config.health_timeout).await {
            Ok(()) => {
                info!("VS Code Server health check passed");
                true
            }
            Err(HealthError::ConnectionRefused | HealthError::Timeout) => {
                warn!("VS Code Server health check failed - service may not be ready yet");
                false
            }
            Err(e) => {
                warn!("VS Code Server health check failed: {e}");
                false
            }
        }
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
