//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; printing happens in [super::Reporter].
//! Styling goes through `console`, which drops colors when the stream is not
//! a terminal.

use crate::boundary::BoundaryWarning;
use console::style;

/// Commit messages are shown by their subject, cut to this many characters
const SUBJECT_WIDTH: usize = 72;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

fn short_subject(message: &str) -> String {
    let subject = crate::domain::commit::subject_of(message);
    if subject.chars().count() > SUBJECT_WIDTH {
        let cut: String = subject.chars().take(SUBJECT_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        subject.to_string()
    }
}

fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", short_subject(item.as_ref())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every commit considered for the release
pub fn format_commit_list<S: AsRef<str>>(commits: &[S]) -> String {
    format!(
        "{}\n{}",
        style(format!("Commits to analyse ({}):", commits.len())).bold(),
        bullet_list(commits)
    )
}

/// Labelled commits (e.g. `Minor: feat: add x`) that decided the bump
pub fn format_triggering_commits<S: AsRef<str>>(commits: &[S]) -> String {
    format!("{}\n{}", style("Triggering commits:").bold(), bullet_list(commits))
}

/// Commits whose type is not configured
pub fn format_unknown_commits<S: AsRef<str>>(commits: &[S]) -> String {
    let hint = "Consider configuring these types in .versionrc.toml \
                or using standard Conventional Commits types.";

    format!(
        "{} The following commits have unknown or unconfigured types \
         and did not trigger a version bump:\n{}\n{}",
        style("Warning:").yellow(),
        bullet_list(commits),
        style(hint).dim()
    )
}
