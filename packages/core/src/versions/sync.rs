//! Container tool version synchronization
//!
//! Applies `.versions.env` to the Dockerfile and reports on upstream releases.
//! Developer-local tools (Docker, Buildx, Git) are not managed here.

use super::build_file::{ArgOutcome, update_build_args};
use super::manifest::VersionManifest;
use super::release::{GhCliReleaseSource, RELEASE_REPOSITORIES, ReleaseSource, normalize_tag};
use super::report::render_report;
use super::status::{LatestVersion, VersionCheck};
use crate::config::ProjectLayout;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(".versions.env file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid build argument pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildFileOutcome {
    Missing,
    Unchanged,
    Updated,
}

pub struct VersionSynchronizer<R = GhCliReleaseSource> {
    layout: ProjectLayout,
    releases: R,
    versions: VersionManifest,
}

impl VersionSynchronizer<GhCliReleaseSource> {
    pub fn new(layout: ProjectLayout) -> Self {
        Self::with_release_source(layout, GhCliReleaseSource::new())
    }
}

impl<R: ReleaseSource> VersionSynchronizer<R> {
    pub fn with_release_source(layout: ProjectLayout, releases: R) -> Self {
        Self {
            layout,
            releases,
            versions: VersionManifest::new(),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Versions loaded by the last [`load_versions`](Self::load_versions)
    pub fn versions(&self) -> &VersionManifest {
        &self.versions
    }

    /// Load and cache the manifest
    pub fn load_versions(&mut self) -> Result<&VersionManifest, SyncError> {
        let path = self.layout.manifest_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SyncError::ManifestNotFound(path));
            }
            Err(source) => return Err(SyncError::Read { path, source }),
        };

        info!("Loading container tool versions from {}", path.display());
        let parsed = VersionManifest::parse(&content);
        self.versions = parsed.manifest;
        info!("Loaded container tool versions: {}", self.versions);
        Ok(&self.versions)
    }

    /// Rewrite the Dockerfile's tool arguments to the loaded versions
    ///
    /// Returns whether the file changed. A missing Dockerfile is logged and
    /// reported as `false`.
    pub fn update_build_file(&self) -> Result<bool, SyncError> {
        Ok(self.apply_build_file()? == BuildFileOutcome::Updated)
    }

    fn apply_build_file(&self) -> Result<BuildFileOutcome, SyncError> {
        let path = self.layout.build_file_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("Dockerfile not found: {}", path.display());
                return Ok(BuildFileOutcome::Missing);
            }
            Err(source) => return Err(SyncError::Read { path, source }),
        };

        info!("Updating container tool versions in Dockerfile...");
        let update = update_build_args(&content, &self.versions)?;
        for (key, outcome) in &update.outcomes {
            match outcome {
                ArgOutcome::Updated { old, new } => info!("{key}: {old} → {new}"),
                ArgOutcome::Current(version) => info!("{key}: already current ({version})"),
            }
        }

        if !update.changed() {
            return Ok(BuildFileOutcome::Unchanged);
        }

        fs::write(&path, &update.content).map_err(|source| SyncError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Dockerfile container tool versions updated");
        Ok(BuildFileOutcome::Updated)
    }

    /// Compare loaded versions with the latest upstream releases
    ///
    /// A failed lookup marks only that tool as unknown.
    pub async fn check_latest_versions(&self) -> Vec<VersionCheck> {
        info!("Checking latest container tool versions...");
        let mut checks = Vec::with_capacity(RELEASE_REPOSITORIES.len());

        for (key, maybe_repo) in RELEASE_REPOSITORIES {
            let current = self.versions.get(key).unwrap_or("unknown").to_string();
            let Some(repo) = maybe_repo else {
                checks.push(VersionCheck::new(key, current, LatestVersion::CheckManually));
                continue;
            };

            let latest = match self.releases.latest_tag(repo).await {
                Ok(tag) => {
                    let latest = normalize_tag(&tag).to_string();
                    if latest == current {
                        info!("{key}: {current} (current)");
                    } else {
                        warn!("{key}: {current} → {latest} (update available)");
                    }
                    LatestVersion::Known(latest)
                }
                Err(e) => {
                    error!("{key}: latest version check failed: {e}");
                    LatestVersion::Unknown
                }
            };
            checks.push(VersionCheck::new(key, current, latest));
        }

        checks
    }

    /// Render the status report, including a fresh latest-version check
    pub async fn generate_report(&self) -> String {
        info!("Generating container tool version report...");
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string();
        let checks = self.check_latest_versions().await;
        render_report(&generated_at, &self.versions, &checks)
    }

    /// Load the manifest and apply it, or preview with `dry_run`
    ///
    /// Errors are logged and reported as `false`.
    pub async fn sync_all(&mut self, dry_run: bool) -> bool {
        if dry_run {
            info!("Starting container tool version sync (dry run)");
        } else {
            info!("Starting container tool version sync");
        }

        if let Err(e) = self.load_versions() {
            error!("Sync failed: {e}");
            return false;
        }

        if dry_run {
            info!("Previewing changes:");
            let report = self.generate_report().await;
            println!("\n{report}");
            return true;
        }

        match self.apply_build_file() {
            Ok(BuildFileOutcome::Updated) => {
                info!("Updated files: Dockerfile");
                true
            }
            Ok(BuildFileOutcome::Unchanged) => {
                info!("All container tools are already current");
                true
            }
            Ok(BuildFileOutcome::Missing) => false,
            Err(e) => {
                error!("Sync failed: {e}");
                false
            }
        }
    }
}
