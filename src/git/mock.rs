use crate::domain::TagNaming;
use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, Repository};
use std::cell::RefCell;

/// A tag created through [Repository::create_tag]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub message: Option<String>,
    pub force: bool,
}

/// A push performed through [Repository::push]
#[derive(Debug, Clone, PartialEq)]
pub struct PushedRefs {
    pub remote: String,
    pub refspecs: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    /// Linear history, oldest first
    history: Vec<CommitInfo>,
    /// Tag name -> commit hash
    tags: Vec<(String, String)>,
    committed: Vec<(Vec<String>, String)>,
    created_tags: Vec<CreatedTag>,
    pushes: Vec<PushedRefs>,
}

/// Mock repository for testing without actual git operations.
///
/// History is linear; write operations are recorded so tests can assert on
/// them.
#[derive(Debug, Default)]
pub struct MockRepository {
    state: RefCell<State>,
    branch: Option<String>,
    failing_push: bool,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            branch: Some("main".to_string()),
            ..Default::default()
        }
    }

    /// Append a commit to the history and return its hash
    pub fn add_commit(&self, message: impl Into<String>) -> String {
        let mut state = self.state.borrow_mut();
        let hash = format!("{:040x}", state.history.len() + 1);
        state.history.push(CommitInfo {
            hash: hash.clone(),
            message: message.into(),
        });
        hash
    }

    /// Add a tag pointing at the current HEAD commit
    pub fn add_tag(&self, name: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        if let Some(head) = state.history.last().map(|c| c.hash.clone()) {
            let name = name.into();
            state.tags.retain(|(existing, _)| *existing != name);
            state.tags.push((name, head));
        }
    }

    /// Detach HEAD
    pub fn detach_head(mut self) -> Self {
        self.branch = None;
        self
    }

    /// Make every push fail
    pub fn with_failing_push(mut self) -> Self {
        self.failing_push = true;
        self
    }

    /// (files, message) of every commit made through [Repository::commit_files]
    pub fn committed(&self) -> Vec<(Vec<String>, String)> {
        self.state.borrow().committed.clone()
    }

    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.state.borrow().created_tags.clone()
    }

    pub fn pushes(&self) -> Vec<PushedRefs> {
        self.state.borrow().pushes.clone()
    }

    /// Names of all tags currently in the repository
    pub fn tag_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .tags
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn position_of(&self, hash: &str) -> Option<usize> {
        self.state
            .borrow()
            .history
            .iter()
            .position(|c| c.hash == hash)
    }
}

impl Repository for MockRepository {
    fn latest_tag(&self, naming: &TagNaming) -> Result<Option<String>> {
        let state = self.state.borrow();

        for commit in state.history.iter().rev() {
            let newest = state
                .tags
                .iter()
                .filter(|(name, hash)| *hash == commit.hash && naming.is_release_tag(name))
                .max_by_key(|(name, _)| naming.version_of(name).ok())
                .map(|(name, _)| name.clone());

            if newest.is_some() {
                return Ok(newest);
            }
        }

        Ok(None)
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let start = match tag {
            Some(tag) => {
                let hash = self
                    .state
                    .borrow()
                    .tags
                    .iter()
                    .find(|(name, _)| name == tag)
                    .map(|(_, hash)| hash.clone())
                    .ok_or_else(|| BumpError::config(format!("Cannot resolve tag '{}'", tag)))?;
                self.position_of(&hash).map_or(0, |pos| pos + 1)
            }
            None => 0,
        };

        let state = self.state.borrow();
        Ok(state.history[start..].iter().rev().cloned().collect())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn commit_files(&self, files: &[String], message: &str) -> Result<String> {
        let hash = self.add_commit(message);
        self.state
            .borrow_mut()
            .committed
            .push((files.to_vec(), message.to_string()));
        Ok(hash)
    }

    fn create_tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()> {
        if !force && self.tag_names().iter().any(|existing| existing == name) {
            return Err(BumpError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }

        self.add_tag(name);
        self.state.borrow_mut().created_tags.push(CreatedTag {
            name: name.to_string(),
            message: message.map(str::to_string),
            force,
        });
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        if self.failing_push {
            return Err(BumpError::Git(git2::Error::from_str(
                "remote rejected the push",
            )));
        }

        self.state.borrow_mut().pushes.push(PushedRefs {
            remote: remote.to_string(),
            refspecs: refspecs.to_vec(),
        });
        Ok(())
    }
}
