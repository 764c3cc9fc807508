//! serve-remote - start the remote code server for this pod

use std::process::ExitCode;

fn main() -> ExitCode {
    devpod_ops::run_serve_remote()
}
