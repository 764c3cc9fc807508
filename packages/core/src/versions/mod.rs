//! Container tool versions
//!
//! This module provides:
//! - `.versions.env` manifest parsing
//! - Dockerfile `ARG` rewriting for the tracked container tools
//! - latest-release lookups through the GitHub CLI
//! - the Markdown status report
//! - [`VersionSynchronizer`], which ties them together

mod build_file;
mod manifest;
mod release;
mod report;
mod status;
mod sync;

pub use build_file::{ArgOutcome, BuildFileUpdate, TRACKED_BUILD_ARGS, update_build_args};
pub use manifest::{ManifestParse, SkippedLine, VersionManifest};
pub use release::{
    GhCliReleaseSource, RELEASE_REPOSITORIES, ReleaseError, ReleaseSource, normalize_tag,
};
pub use report::{CONTAINER_TOOL_LOCATIONS, file_location, render_report};
pub use status::{LatestVersion, VersionCheck, VersionStatus};
pub use sync::{SyncError, VersionSynchronizer};
