//! User interface module - human-facing output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Decides what gets printed, and where, for a run

pub mod formatter;

pub use formatter::{
    format_commit_list, format_error, format_status, format_success, format_triggering_commits,
    format_unknown_commits, format_warning,
};

use crate::boundary::BoundaryWarning;

/// Prints workflow progress according to the output flags.
///
/// In raw mode nothing but the version line reaches stdout, so the output can
/// be captured by scripts. Quiet mode only hides the commit list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    raw: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(raw: bool, quiet: bool) -> Self {
        Reporter { raw, quiet }
    }

    pub fn status(&self, message: &str) {
        if !self.raw {
            println!("{}", format_status(message));
        }
    }

    pub fn success(&self, message: &str) {
        if !self.raw {
            println!("{}", format_success(message));
        }
    }

    pub fn warning(&self, warning: &BoundaryWarning) {
        if !self.raw {
            eprintln!("{}", format_warning(warning));
        }
    }

    pub fn commit_list(&self, commits: &[String]) {
        if !self.raw && !self.quiet && !commits.is_empty() {
            println!("{}", format_commit_list(commits));
        }
    }

    pub fn triggering_commits(&self, commits: &[String]) {
        if !self.raw && !commits.is_empty() {
            println!("{}", format_triggering_commits(commits));
        }
    }

    pub fn unknown_commits(&self, commits: &[String]) {
        if !self.raw && !commits.is_empty() {
            println!("{}", format_unknown_commits(commits));
        }
    }

    /// The machine-readable result of a raw run
    pub fn version(&self, version: &str) {
        if self.raw {
            println!("{}", version);
        }
    }
}

/// Errors are always shown, on stderr
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}
