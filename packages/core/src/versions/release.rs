//! Upstream release lookups
//!
//! Latest releases are read through the GitHub CLI:
//! `gh api repos/<repo>/releases/latest --jq .tag_name`.

use crate::config::defaults::RELEASE_QUERY_TIMEOUT;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Tools checked against upstream, in report order
///
/// Go has no repository and is always reported as "check manually".
pub const RELEASE_REPOSITORIES: [(&str, Option<&str>); 3] = [
    ("GO_VERSION", None),
    ("GH_VERSION", Some("cli/cli")),
    ("TINYGO_VERSION", Some("tinygo-org/tinygo")),
];

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("{0} command not found")]
    CommandNotFound(String),

    #[error("release query timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("release query failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("release query failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of latest release tags
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// Latest release tag of `repository` (`owner/name`), as published
    async fn latest_tag(&self, repository: &str) -> Result<String, ReleaseError>;
}

/// Queries releases through the `gh` CLI
#[derive(Debug, Clone)]
pub struct GhCliReleaseSource {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl Default for GhCliReleaseSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GhCliReleaseSource {
    pub fn new() -> Self {
        Self::with_command("gh", Vec::new(), RELEASE_QUERY_TIMEOUT)
    }

    /// Run the query through another command
    ///
    /// The `api ...` arguments are appended after `leading_args`, so a wrapper
    /// such as `sh -c '<script>' gh` receives them as positional parameters.
    pub fn with_command(
        program: impl Into<String>,
        leading_args: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            leading_args,
            timeout,
        }
    }

    fn query_args(&self, repository: &str) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend([
            "api".to_string(),
            format!("repos/{repository}/releases/latest"),
            "--jq".to_string(),
            ".tag_name".to_string(),
        ]);
        args
    }
}

impl ReleaseSource for GhCliReleaseSource {
    async fn latest_tag(&self, repository: &str) -> Result<String, ReleaseError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.query_args(repository))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Err(_) => return Err(ReleaseError::Timeout(self.timeout)),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(ReleaseError::CommandNotFound(self.program.clone()));
            }
            Ok(Err(e)) => return Err(ReleaseError::Io(e)),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(ReleaseError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Strip one leading `v` from a release tag
pub fn normalize_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('v').unwrap_or(tag)
}
