//! Tracing subscriber construction
//!
//! Both binaries build their subscriber explicitly and install it as the
//! default for the duration of the run.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verbosity {
    pub verbose: u8,
    pub quiet: bool,
    pub color: bool,
}

impl Verbosity {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` or the requested verbosity
pub fn subscriber(verbosity: Verbosity) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(verbosity.color)
        .with_target(false)
        .finish()
}
