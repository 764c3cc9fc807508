//! Current-versus-latest comparison records.

use std::fmt;

/// Latest upstream version, when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestVersion {
    Known(String),
    /// The lookup failed.
    Unknown,
    /// No automated lookup exists for this tool.
    CheckManually,
}

impl fmt::Display for LatestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestVersion::Known(version) => f.write_str(version),
            LatestVersion::Unknown => f.write_str("unknown"),
            LatestVersion::CheckManually => f.write_str("check manually"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    NeedsCheck,
    ManualCheck,
    Current,
    UpdateAvailable,
}

impl VersionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VersionStatus::NeedsCheck => "needs check",
            VersionStatus::ManualCheck => "manual check",
            VersionStatus::Current => "current",
            VersionStatus::UpdateAvailable => "update available",
        }
    }
}

/// One tool's configured version against the latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub key: String,
    /// Manifest value, or "unknown" when the manifest lacks the key
    pub current: String,
    pub latest: LatestVersion,
}

impl VersionCheck {
    pub fn new(key: impl Into<String>, current: impl Into<String>, latest: LatestVersion) -> Self {
        Self {
            key: key.into(),
            current: current.into(),
            latest,
        }
    }

    pub fn status(&self) -> VersionStatus {
        match &self.latest {
            LatestVersion::Unknown => VersionStatus::NeedsCheck,
            LatestVersion::CheckManually => VersionStatus::ManualCheck,
            LatestVersion::Known(latest) if *latest == self.current => VersionStatus::Current,
            LatestVersion::Known(_) => VersionStatus::UpdateAvailable,
        }
    }
}
