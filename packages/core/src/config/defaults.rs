//! Fixed defaults shared by the launcher and the version synchronizer.

use std::time::Duration;

/// Environment variable holding the pod identifier.
pub const POD_ID_ENV: &str = "RUNPOD_POD_ID";

/// Environment variable overriding the synchronizer project root.
pub const PROJECT_ROOT_ENV: &str = "DEVPOD_PROJECT_ROOT";

/// Remote server binary.
pub const SERVER_BINARY: &str = "code-server";

/// Fixed arguments for the remote server: accept license, no telemetry, serve.
pub const SERVER_ARGS: [&str; 3] = [
    "--accept-server-license-terms",
    "--disable-telemetry",
    "serve",
];

/// Default expect timeout for the spawned session.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Wait per prompt-loop iteration before assuming setup is done.
pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Local health endpoint probed after a successful launch.
pub const HEALTH_URL: &str = "http://localhost:8000/healthz";

/// Timeout for the single health request.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Grace period between launch and the health probe.
pub const HEALTH_GRACE: Duration = Duration::from_secs(2);

/// Version manifest, relative to the project root.
pub const MANIFEST_FILE_NAME: &str = ".versions.env";

/// Container build file, relative to the project root.
pub const BUILD_FILE_NAME: &str = "Dockerfile";

/// Timeout for a single release lookup.
pub const RELEASE_QUERY_TIMEOUT: Duration = Duration::from_secs(10);
