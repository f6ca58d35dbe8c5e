//! Git operations abstraction layer
//!
//! The release workflow depends on the [Repository] trait rather than on
//! `git2` directly:
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! ```rust
//! # use git_bump::git::Repository;
//! # use git_bump::domain::TagNaming;
//! # fn example<R: Repository>(repo: &R) -> git_bump::Result<()> {
//! let latest = repo.latest_tag(&TagNaming::new("v"))?;
//! let commits = repo.commits_since(latest.as_deref())?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagNaming;
use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message, trailing whitespace removed
    pub message: String,
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]; implementations map
/// underlying failures to [crate::error::BumpError] variants.
pub trait Repository {
    /// Nearest release tag reachable from HEAD.
    ///
    /// Only tags accepted by [TagNaming::is_release_tag] are considered, so
    /// movable major/minor tags are skipped. When several release tags point
    /// at the same commit the highest version wins.
    ///
    /// # Returns
    /// * `Ok(None)` - No release tag, or the repository has no commits yet
    fn latest_tag(&self, naming: &TagNaming) -> Result<Option<String>>;

    /// Commits reachable from HEAD but not from `tag`, newest first.
    ///
    /// With `tag = None` the whole history of HEAD is returned.
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Name of the checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Stage `files` (relative to the working tree) and commit them on HEAD.
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the new commit
    fn commit_files(&self, files: &[String], message: &str) -> Result<String>;

    /// Tag the HEAD commit.
    ///
    /// With a `message` the tag is annotated, otherwise lightweight. `force`
    /// moves an existing tag of the same name.
    fn create_tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()>;

    /// Push refspecs (e.g. `refs/tags/v1.0.0:refs/tags/v1.0.0`, prefixed with
    /// `+` to force) to a remote
    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()>;
}
