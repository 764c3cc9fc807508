//! Dockerfile build-argument rewriting
//!
//! Only the container tool arguments below are touched; each is expected in
//! the form `ARG <KEY>="<VERSION>"`.

use super::manifest::VersionManifest;
use regex_lite::{NoExpand, Regex};

/// Build arguments kept in sync with the manifest, in update order
pub const TRACKED_BUILD_ARGS: [&str; 4] = [
    "GO_VERSION",
    "TINYGO_VERSION",
    "GH_VERSION",
    "VS_CODE_VERSION",
];

/// What happened to one tracked argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgOutcome {
    Updated { old: String, new: String },
    Current(String),
}

/// Result of applying the manifest to build-file text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFileUpdate {
    pub content: String,
    /// Per-key outcome for tracked keys present in both manifest and file
    pub outcomes: Vec<(&'static str, ArgOutcome)>,
}

impl BuildFileUpdate {
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, ArgOutcome::Updated { .. }))
    }
}

fn arg_pattern(key: &str) -> Result<Regex, regex_lite::Error> {
    Regex::new(&format!(r#"ARG {key}="([^"]*)""#))
}

/// Rewrite tracked `ARG` declarations to the manifest versions
///
/// Keys missing from the manifest, or without a declaration in `content`,
/// are left alone. Every matching declaration of a key is rewritten.
pub fn update_build_args(
    content: &str,
    manifest: &VersionManifest,
) -> Result<BuildFileUpdate, regex_lite::Error> {
    let mut content = content.to_string();
    let mut outcomes = Vec::new();

    for key in TRACKED_BUILD_ARGS {
        let Some(new_version) = manifest.get(key) else {
            continue;
        };
        let pattern = arg_pattern(key)?;
        let Some(old_version) = pattern
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };

        if old_version == new_version {
            outcomes.push((key, ArgOutcome::Current(old_version)));
            continue;
        }

        let replacement = format!(r#"ARG {key}="{new_version}""#);
        content = pattern
            .replace_all(&content, NoExpand(&replacement))
            .into_owned();
        outcomes.push((
            key,
            ArgOutcome::Updated {
                old: old_version,
                new: new_version.to_string(),
            },
        ));
    }

    Ok(BuildFileUpdate { content, outcomes })
}
