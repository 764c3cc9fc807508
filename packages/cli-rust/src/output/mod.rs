//! Output utilities for the binaries
//!
//! Human-facing status lines go to stderr next to the logs; the report is
//! the only thing written to stdout.

pub mod colors;

pub use colors::{name_style, outcome_style};

use console::style;

/// Prints the banner and final status line unless `--quiet` was given
#[derive(Debug, Clone, Copy)]
pub struct StatusPrinter {
    quiet: bool,
}

impl StatusPrinter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn banner(&self, name: &str, version: &str) {
        if !self.quiet {
            eprintln!("{} {}", name_style(name), style(version).dim());
        }
    }

    pub fn outcome(&self, success: bool, message: &str) {
        if !self.quiet {
            eprintln!("{}", outcome_style(success, message));
        }
    }
}
