use crate::domain::TagNaming;
use crate::error::{BumpError, Result};
use crate::git::CommitInfo;
use git2::{Commit, ErrorCode, Oid, Repository as Git2Repo, Signature};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    fallback_name: Option<String>,
    fallback_email: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            fallback_name: None,
            fallback_email: None,
        }
    }

    /// Identity used for commits and annotated tags when git config has none
    pub fn with_identity(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.fallback_name = name;
        self.fallback_email = email;
        self
    }

    /// Root of the working tree, `None` for bare repositories
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature.to_owned()),
            Err(e) => match (&self.fallback_name, &self.fallback_email) {
                (Some(name), Some(email)) => {
                    debug!(name = %name, email = %email, "using configured commit identity");
                    Ok(Signature::now(name, email)?)
                }
                _ => Err(BumpError::Git(e)),
            },
        }
    }

    /// HEAD commit, or `None` for a repository without commits
    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn tag_target(&self, tag_name: &str) -> Result<Oid> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))?;
        Ok(reference.peel_to_commit()?.id())
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();

        callbacks.credentials(|url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Ok(config) = self.repo.config() {
                    if let Ok(cred) = git2::Cred::credential_helper(&config, url, username_from_url)
                    {
                        return Ok(cred);
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(reference = %refname, status = %status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn latest_tag(&self, naming: &TagNaming) -> Result<Option<String>> {
        let Some(head) = self.head_commit()? else {
            return Ok(None);
        };

        // Commit -> release tags pointing at it (lightweight and annotated)
        let mut tags_by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        for tag_name in self.repo.tag_names(None)?.iter().flatten() {
            if !naming.is_release_tag(tag_name) {
                continue;
            }
            match self.tag_target(tag_name) {
                Ok(oid) => tags_by_commit
                    .entry(oid)
                    .or_default()
                    .push(tag_name.to_string()),
                Err(e) => debug!(tag = %tag_name, error = %e, "skipping tag without commit"),
            }
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(head.id())?;

        for oid in revwalk {
            if let Some(tags) = tags_by_commit.get(&oid?) {
                let newest = tags
                    .iter()
                    .max_by_key(|tag| naming.version_of(tag).ok())
                    .cloned();
                return Ok(newest);
            }
        }

        Ok(None)
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let Some(head) = self.head_commit()? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(head.id())?;

        if let Some(tag) = tag {
            let tag_oid = self
                .tag_target(tag)
                .map_err(|e| BumpError::config(format!("Cannot resolve tag '{}': {}", tag, e)))?;
            revwalk.hide(tag_oid)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let message = String::from_utf8_lossy(commit.message_bytes())
                .trim_end()
                .to_string();

            commits.push(CommitInfo {
                hash: commit.id().to_string(),
                message,
            });
        }

        debug!(count = commits.len(), since = ?tag, "collected commits");
        Ok(commits)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_files(&self, files: &[String], message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        for file in files {
            index.add_path(Path::new(file))?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.signature()?;
        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!(commit = %oid, files = ?files, "committed files");
        Ok(oid.to_string())
    }

    fn create_tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()> {
        let head = self
            .head_commit()?
            .ok_or_else(|| BumpError::config("Cannot tag a repository without commits"))?;

        match message {
            Some(message) => {
                let signature = self.signature()?;
                self.repo
                    .tag(name, head.as_object(), &signature, message, force)?;
            }
            None => {
                self.repo.tag_lightweight(name, head.as_object(), force)?;
            }
        }

        debug!(tag = %name, annotated = message.is_some(), force, "created tag");
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        let mut remote_handle = self.repo.find_remote(remote)?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        let refspec_strs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
        remote_handle.push(&refspec_strs, Some(&mut push_options))?;

        debug!(remote = %remote, refspecs = ?refspecs, "pushed");
        Ok(())
    }
}
