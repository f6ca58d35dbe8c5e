use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user and never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commits since the latest tag (or in the whole history)
    NoNewCommits { latest_tag: Option<String> },
    /// Commits whose type is not in the mapping and triggered nothing
    UnknownCommitTypes { count: usize },
    /// Release notes were requested but no tag will be created
    ReleaseNotesWithoutTag,
    /// The manifest version is older than the latest tag
    ManifestBehindTag {
        manifest_version: String,
        tag_version: String,
    },
    /// Latest release tag cannot be parsed as a version
    UnparsableTag { tag: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { latest_tag } => match latest_tag {
                Some(tag) => write!(f, "No commits since tag '{}'", tag),
                None => write!(f, "No commits found in repository history"),
            },
            BoundaryWarning::UnknownCommitTypes { count } => write!(
                f,
                "{} commit(s) have unknown or unconfigured types and did not trigger a version bump",
                count
            ),
            BoundaryWarning::ReleaseNotesWithoutTag => {
                write!(f, "--release-notes requires --tag to be effective")
            }
            BoundaryWarning::ManifestBehindTag {
                manifest_version,
                tag_version,
            } => write!(
                f,
                "Package version {} is behind latest tag version {}",
                manifest_version, tag_version
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
        }
    }
}
