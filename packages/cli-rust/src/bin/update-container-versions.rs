//! update-container-versions - sync container tool versions from .versions.env

use std::process::ExitCode;

fn main() -> ExitCode {
    devpod_ops::run_update_versions()
}
