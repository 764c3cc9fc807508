//! devpod-ops core library
//!
//! Shared implementation behind the pod utilities:
//! - `launcher`: starts the remote code server and answers its setup prompts
//! - `versions`: keeps container tool versions in the Dockerfile in sync with
//!   the `.versions.env` manifest and reports on upstream releases

pub mod config;
pub mod launcher;
pub mod versions;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, LauncherConfig, ProjectLayout};
pub use launcher::{
    HealthError, InteractiveSession, LaunchError, LaunchSuccess, Launcher, ProcessSession,
    check_health, interrupted,
};
pub use versions::{
    GhCliReleaseSource, LatestVersion, ReleaseError, ReleaseSource, SyncError, VersionCheck,
    VersionManifest, VersionStatus, VersionSynchronizer,
};

/// Library version from Cargo.toml
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
