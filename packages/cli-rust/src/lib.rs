//! devpod-ops CLI - pod utilities
//!
//! This module contains the shared CLI implementation used by both binaries:
//! `serve-remote` and `update-container-versions`.

mod logging;
mod output;

use crate::logging::Verbosity;
use crate::output::StatusPrinter;
use anyhow::{Context, Result};
use clap::{Args, Parser};
use devpod_ops_core::{Launcher, ProjectLayout, VersionSynchronizer, get_version, interrupted};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Flags shared by both binaries
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Increase verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl CommonArgs {
    fn verbosity(&self) -> Verbosity {
        Verbosity {
            verbose: self.verbose,
            quiet: self.quiet,
            color: !self.no_color,
        }
    }

    fn apply_color(&self) {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
    }
}

/// Start the remote code server and answer its setup prompts
#[derive(Parser, Debug)]
#[command(name = "serve-remote")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Start the remote code server for this pod", long_about = None)]
struct ServeRemoteCli {
    #[command(flatten)]
    common: CommonArgs,
}

/// Sync container tool versions from .versions.env into the Dockerfile
#[derive(Parser, Debug)]
#[command(name = "update-container-versions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Sync container tool versions from .versions.env",
    long_about = "Reads .versions.env and updates the ARG declarations in the Dockerfile.\n\
                  Developer-local tools (Docker, Buildx, Git) are managed separately."
)]
struct UpdateVersionsCli {
    /// Preview changes without writing files
    #[arg(long)]
    dry_run: bool,

    /// Print the version report and exit
    #[arg(long)]
    report: bool,

    /// Check for the latest upstream releases and print the report
    #[arg(long)]
    check_latest: bool,

    /// Directory containing .versions.env and the Dockerfile
    #[arg(long, value_name = "PATH")]
    project_root: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

impl UpdateVersionsCli {
    fn report_only(&self) -> bool {
        self.report || self.check_latest
    }
}

/// Entry point of the `serve-remote` binary
pub fn run_serve_remote() -> ExitCode {
    let cli = ServeRemoteCli::parse();
    cli.common.apply_color();
    let _log = tracing::subscriber::set_default(logging::subscriber(cli.common.verbosity()));
    let printer = StatusPrinter::new(cli.common.quiet);
    printer.banner("serve-remote", get_version());

    match serve_remote() {
        Ok(true) => {
            printer.outcome(true, "VS Code Server session finished");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            printer.outcome(false, "VS Code Server launch failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Unexpected error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn serve_remote() -> Result<bool> {
    let launcher = match Launcher::from_env() {
        Ok(launcher) => launcher,
        Err(e) => {
            error!("{e}");
            return Ok(false);
        }
    };
    let runtime = current_thread_runtime()?;

    Ok(runtime.block_on(async {
        if !launcher.launch().await {
            return false;
        }
        tokio::select! {
            _ = launcher.health_check() => {}
            _ = interrupted() => info!("Health check skipped after interrupt"),
        }
        true
    }))
}

/// Entry point of the `update-container-versions` binary
pub fn run_update_versions() -> ExitCode {
    let cli = UpdateVersionsCli::parse();
    cli.common.apply_color();
    let _log = tracing::subscriber::set_default(logging::subscriber(cli.common.verbosity()));
    let printer = StatusPrinter::new(cli.common.quiet);

    let result = current_thread_runtime()
        .and_then(|runtime| runtime.block_on(until_interrupted(update_versions(&cli))));

    match result {
        Ok(true) => {
            if !cli.report_only() {
                printer.outcome(true, "Container tool versions are in sync");
            }
            ExitCode::SUCCESS
        }
        Ok(false) => {
            printer.outcome(false, "Container tool version sync failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Unexpected error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn update_versions(cli: &UpdateVersionsCli) -> Result<bool> {
    let layout = ProjectLayout::resolve(cli.project_root.as_deref())?;

    if cli.report_only() {
        print!("{}", version_report(layout).await?);
        return Ok(true);
    }

    let mut synchronizer = VersionSynchronizer::new(layout);
    Ok(synchronizer.sync_all(cli.dry_run).await)
}

async fn version_report(layout: ProjectLayout) -> Result<String> {
    let mut synchronizer = VersionSynchronizer::new(layout);
    synchronizer.load_versions()?;
    let report = synchronizer.generate_report().await;
    Ok(format!("{report}\n"))
}

/// Run `work`, treating Ctrl+C as a successful early stop
async fn until_interrupted<F>(work: F) -> Result<bool>
where
    F: Future<Output = Result<bool>>,
{
    tokio::select! {
        result = work => result,
        _ = interrupted() => {
            info!("Operation cancelled by user");
            Ok(true)
        }
    }
}

fn current_thread_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
