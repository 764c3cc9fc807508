//! Configuration for devpod-ops
//!
//! Both utilities are configured from the environment (plus CLI flags for the
//! synchronizer); nothing is read from or persisted to a config file.

pub mod defaults;
mod schema;

pub use schema::{LauncherConfig, ProjectLayout};

/// Configuration errors raised while constructing a component
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{} environment variable is not set", defaults::POD_ID_ENV)]
    MissingPodId,

    #[error("Cannot resolve project root: {0}")]
    ProjectRoot(String),
}
