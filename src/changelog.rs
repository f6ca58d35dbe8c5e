//! Keep-a-Changelog maintenance
//!
//! Entries are rendered from commit messages by [render_entry] and spliced
//! into the existing file by [insert_entry]; only [write_entry] touches the
//! filesystem.

use crate::domain::{ParsedCommit, Version};
use crate::error::{BumpError, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

const HEADER: &str = "# Changelog\n\n\
All notable changes to this project will be documented in this file.\n\n\
The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),\n\
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).\n\n";

/// Keep-a-Changelog sections, in the order they are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl Category {
    fn for_commit(commit: &ParsedCommit) -> Self {
        if commit.is_breaking_change {
            return Category::Changed;
        }

        match commit.r#type.as_str() {
            "feat" => Category::Added,
            "fix" => Category::Fixed,
            "revert" => Category::Removed,
            "security" => Category::Security,
            _ => Category::Changed,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Added => "Added",
            Category::Changed => "Changed",
            Category::Deprecated => "Deprecated",
            Category::Removed => "Removed",
            Category::Fixed => "Fixed",
            Category::Security => "Security",
        };
        write!(f, "{}", name)
    }
}

fn categorize(message: &str) -> (Category, String) {
    let subject = crate::domain::commit::subject_of(message);

    match ParsedCommit::parse(message) {
        Some(commit) => {
            let category = Category::for_commit(&commit);
            // `fix:` alone has nothing after the colon
            let text = if commit.description.trim().is_empty() {
                subject.trim()
            } else {
                commit.description.as_str()
            };
            if commit.is_breaking_change {
                (category, format!("**BREAKING:** {}", text))
            } else {
                (category, text.to_string())
            }
        }
        None => (Category::Changed, subject.to_string()),
    }
}

/// Render the `## [version] - date` section for `commits`.
///
/// Commits whose subject starts with one of `skip_prefixes` (release and
/// sync commits) are left out. Entries keep commit order within a section.
pub fn render_entry<S: AsRef<str>>(
    version: &Version,
    date: &str,
    commits: &[S],
    skip_prefixes: &[&str],
) -> String {
    let mut changes: Vec<(Category, String)> = commits
        .iter()
        .map(|commit| commit.as_ref())
        .filter(|message| !message.trim().is_empty())
        .filter(|message| {
            !skip_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && message.starts_with(prefix))
        })
        .map(categorize)
        .collect();

    // stable: keeps commit order inside a category
    changes.sort_by_key(|(category, _)| *category);

    let mut entry = format!("## [{}] - {}\n\n", version, date);
    let mut current = None;

    for (category, description) in changes {
        if current != Some(category) {
            if current.is_some() {
                entry.push('\n');
            }
            entry.push_str(&format!("### {}\n\n", category));
            current = Some(category);
        }
        entry.push_str(&format!("- {}\n", description));
    }
    entry.push('\n');

    entry
}

/// Place `entry` above the newest release in `existing`, or after a fresh
/// header when there is no changelog yet
pub fn insert_entry(existing: Option<&str>, entry: &str) -> String {
    let mut content = match existing {
        Some(existing) => existing.to_string(),
        None => HEADER.to_string(),
    };

    let insertion_point = if content.starts_with("## [") {
        0
    } else {
        match content.find("\n## [") {
            Some(pos) => pos + 1,
            None => {
                if !content.is_empty() && !content.ends_with("\n\n") {
                    content.push_str(if content.ends_with('\n') { "\n" } else { "\n\n" });
                }
                content.len()
            }
        }
    };

    content.insert_str(insertion_point, entry);
    content
}

/// Render and write a new entry into the changelog at `path`
pub fn write_entry<S: AsRef<str>>(
    path: &Path,
    version: &Version,
    date: &str,
    commits: &[S],
    skip_prefixes: &[&str],
) -> Result<()> {
    let existing = if path.exists() {
        Some(fs::read_to_string(path).map_err(|e| {
            BumpError::changelog(format!("Cannot read {}: {}", path.display(), e))
        })?)
    } else {
        None
    };

    let entry = render_entry(version, date, commits, skip_prefixes);
    let content = insert_entry(existing.as_deref(), &entry);

    fs::write(path, content)
        .map_err(|e| BumpError::changelog(format!("Cannot write {}: {}", path.display(), e)))?;

    debug!(path = %path.display(), version = %version, "changelog updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SKIP: &[&str] = &["chore: bump version", "chore: sync package version"];

    #[test]
    fn test_render_groups_by_category() {
        let commits = [
            "fix: crash on empty input",
            "feat(api): add endpoint",
            "docs: readme",
            "feat!: drop legacy flag",
            "just a message",
            "chore: bump version to 1.0.0",
        ];

        let entry = render_entry(&Version::new(2, 0, 0), "2024-01-31", &commits, SKIP);

        assert_eq!(
            entry,
            "## [2.0.0] - 2024-01-31\n\n\
             ### Added\n\n\
             - add endpoint\n\n\
             ### Changed\n\n\
             - readme\n\
             - **BREAKING:** drop legacy flag\n\
             - just a message\n\n\
             ### Fixed\n\n\
             - crash on empty input\n\n"
        );
    }

    #[test]
    fn test_render_breaking_footer_and_security() {
        let commits = [
            "refactor: new config\n\nBREAKING CHANGE: keys renamed",
            "security: patch token leak",
            "revert: undo cache",
        ];
        let entry = render_entry(&Version::new(1, 0, 0), "2024-02-01", &commits, SKIP);

        assert!(entry.contains("### Changed\n\n- **BREAKING:** new config\n"));
        assert!(entry.contains("### Removed\n\n- undo cache\n"));
        assert!(entry.contains("### Security\n\n- patch token leak\n"));
        assert!(entry.find("### Removed").unwrap() < entry.find("### Security").unwrap());
    }

    #[test]
    fn test_render_empty_description_uses_subject() {
        let commits = ["fix:", "feat!:  "];
        let entry = render_entry(&Version::new(2, 0, 0), "2024-03-01", &commits, SKIP);

        assert!(entry.contains("### Fixed\n\n- fix:\n"));
        assert!(entry.contains("### Changed\n\n- **BREAKING:** feat!:\n"));
        assert!(!entry.lines().any(|line| line.trim_end() == "-"));
    }

    #[test]
    fn test_insert_into_new_file() {
        let content = insert_entry(None, "## [0.1.0] - 2024-01-01\n\n");
        assert!(content.starts_with("# Changelog\n"));
        assert!(content.ends_with("## [0.1.0] - 2024-01-01\n\n"));
    }

    #[test]
    fn test_insert_above_previous_release() {
        let existing = "# Changelog\n\nIntro.\n\n## [1.0.0] - 2024-01-01\n\n- old\n";
        let content = insert_entry(Some(existing), "## [1.1.0] - 2024-02-01\n\n- new\n\n");

        assert_eq!(
            content,
            "# Changelog\n\nIntro.\n\n## [1.1.0] - 2024-02-01\n\n- new\n\n## [1.0.0] - 2024-01-01\n\n- old\n"
        );
    }

    #[test]
    fn test_write_entry_twice() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CHANGELOG_FILE);

        write_entry(&path, &Version::new(0, 1, 0), "2024-01-01", &["feat: a"], SKIP).unwrap();
        write_entry(&path, &Version::new(0, 1, 1), "2024-01-02", &["fix: b"], SKIP).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let newer = content.find("## [0.1.1]").unwrap();
        let older = content.find("## [0.1.0]").unwrap();
        assert!(newer < older);
        assert_eq!(content.matches("# Changelog").count(), 1);
    }
}
