//! Configuration schema for the launcher and the synchronizer
//!
//! Defines the runtime settings and their defaults.

use super::ConfigError;
use super::defaults::{
    BUILD_FILE_NAME, HEALTH_TIMEOUT, HEALTH_URL, MANIFEST_FILE_NAME, POD_ID_ENV,
    PROJECT_ROOT_ENV, PROMPT_TIMEOUT, SERVER_ARGS, SERVER_BINARY, STARTUP_TIMEOUT,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for launching the remote code server
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
    /// Pod identifier, sent as the machine name
    pub pod_id: String,

    /// Server binary name or path (default: "code-server")
    pub binary: String,

    /// Fixed server arguments
    pub args: Vec<String>,

    /// Default expect timeout for the spawned session (default: 60s)
    pub startup_timeout: Duration,

    /// Wait per prompt-loop iteration (default: 30s)
    pub prompt_timeout: Duration,

    /// Health endpoint probed after launch
    pub health_url: String,

    /// Health probe timeout (default: 5s)
    pub health_timeout: Duration,
}

impl LauncherConfig {
    /// Build a config with defaults for everything but the pod identifier
    pub fn new(pod_id: impl Into<String>) -> Self {
        Self {
            pod_id: pod_id.into(),
            binary: SERVER_BINARY.to_string(),
            args: SERVER_ARGS.iter().map(ToString::to_string).collect(),
            startup_timeout: STARTUP_TIMEOUT,
            prompt_timeout: PROMPT_TIMEOUT,
            health_url: HEALTH_URL.to_string(),
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    /// Read the config from the process environment
    ///
    /// Fails with [`ConfigError::MissingPodId`] when `RUNPOD_POD_ID` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pod_id = lookup(POD_ID_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingPodId)?;
        Ok(Self::new(pod_id))
    }
}

/// Where the synchronizer finds its manifest and build file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the project root
    ///
    /// Resolution order:
    /// 1. explicit path (from `--project-root`)
    /// 2. `DEVPOD_PROJECT_ROOT`
    /// 3. current working directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(explicit, |name: &str| std::env::var_os(name))
    }

    /// [`resolve`](Self::resolve) with an arbitrary variable lookup
    pub fn resolve_with<F>(explicit: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        if let Some(path) = lookup(PROJECT_ROOT_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::new(path));
        }
        std::env::current_dir()
            .map(Self::new)
            .map_err(|e| ConfigError::ProjectRoot(e.to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.versions.env`
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    /// `<root>/Dockerfile`
    pub fn build_file_path(&self) -> PathBuf {
        self.root.join(BUILD_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(pod_id: Option<&str>) -> impl Fn(&str) -> Option<String> {
        let pod_id = pod_id.map(str::to_string);
        move |name| {
            if name == POD_ID_ENV {
                pod_id.clone()
            } else {
                None
            }
        }
    }

    #[test]
    fn test_default_launcher_config() {
        let config = LauncherConfig::new("pod-abc");
        assert_eq!(config.pod_id, "pod-abc");
        assert_eq!(config.binary, "code-server");
        assert_eq!(
            config.args,
            vec!["--accept-server-license-terms", "--disable-telemetry", "serve"]
        );
        assert_eq!(config.startup_timeout, Duration::from_secs(60));
        assert_eq!(config.prompt_timeout, Duration::from_secs(30));
        assert_eq!(config.health_url, "http://localhost:8000/healthz");
        assert_eq!(config.health_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_reads_pod_id() {
        let config = LauncherConfig::from_lookup(lookup_with(Some("pod-xyz"))).unwrap();
        assert_eq!(config.pod_id, "pod-xyz");
    }

    #[test]
    fn test_from_lookup_missing_pod_id() {
        let result = LauncherConfig::from_lookup(lookup_with(None));
        assert_eq!(result, Err(ConfigError::MissingPodId));
    }

    #[test]
    fn test_from_lookup_blank_pod_id() {
        let result = LauncherConfig::from_lookup(lookup_with(Some("   ")));
        assert_eq!(result, Err(ConfigError::MissingPodId));
    }

    #[test]
    fn test_missing_pod_id_message_names_variable() {
        assert!(ConfigError::MissingPodId.to_string().contains("RUNPOD_POD_ID"));
    }

    #[test]
    fn test_project_layout_paths() {
        let layout = ProjectLayout::new("/work/project");
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/work/project/.versions.env")
        );
        assert_eq!(
            layout.build_file_path(),
            PathBuf::from("/work/project/Dockerfile")
        );
    }

    fn root_lookup(value: Option<&str>) -> impl Fn(&str) -> Option<OsString> {
        let value = value.map(OsString::from);
        move |name| {
            if name == PROJECT_ROOT_ENV {
                value.clone()
            } else {
                None
            }
        }
    }

    #[test]
    fn test_project_layout_explicit_root_wins() {
        let layout = ProjectLayout::resolve(Some(Path::new("/explicit"))).unwrap();
        assert_eq!(layout.root(), Path::new("/explicit"));

        let layout =
            ProjectLayout::resolve_with(Some(Path::new("/explicit")), root_lookup(Some("/env")))
                .unwrap();
        assert_eq!(layout.root(), Path::new("/explicit"));
    }

    #[test]
    fn test_project_layout_env_root() {
        let layout = ProjectLayout::resolve_with(None, root_lookup(Some("/from-env"))).unwrap();
        assert_eq!(layout.root(), Path::new("/from-env"));
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/from-env/.versions.env")
        );
    }

    #[test]
    fn test_project_layout_falls_back_to_current_dir() {
        let cwd = std::env::current_dir().unwrap();

        let layout = ProjectLayout::resolve_with(None, root_lookup(None)).unwrap();
        assert_eq!(layout.root(), cwd.as_path());

        let layout = ProjectLayout::resolve_with(None, root_lookup(Some(""))).unwrap();
        assert_eq!(layout.root(), cwd.as_path());
    }
}
