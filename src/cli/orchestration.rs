//! Main workflow orchestration logic
//!
//! Keeps the release workflow out of main.rs: argument parsing stays in the
//! binary, everything else runs against a [Repository] and a project root so
//! it can be driven by tests.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzer::{NoBumpOutput, VersionAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, CHANGELOG_FILE};
use crate::config::{Config, SYNC_COMMIT_PREFIX};
use crate::domain::{BumpLevel, Version};
use crate::git::Repository;
use crate::manifest::load_strategy;
use crate::ui::Reporter;

pub const DEFAULT_REMOTE: &str = "origin";

/// Arguments for the bump workflow
///
/// Only what is not part of [Config]; the binary folds its flags into the
/// configuration before calling [run_bump_workflow].
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    /// Only report the next version; no files, commits, tags or pushes
    pub raw: bool,

    /// Hide the list of analysed commits
    pub quiet: bool,

    /// Remote used for pushing
    pub remote: String,
}

impl Default for BumpWorkflowArgs {
    fn default() -> Self {
        BumpWorkflowArgs {
            raw: false,
            quiet: false,
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowOutcome {
    /// Version the run started from, after any manifest sync
    pub current_version: Version,

    pub bump: BumpLevel,

    /// Version reported to the user; `None` when nothing is due and the
    /// no-bump output is silent
    pub reported_version: Option<Version>,

    /// A new version was computed (and, outside raw mode, applied)
    pub released: bool,

    /// Tag version the manifests were realigned to
    pub synced_to: Option<Version>,

    /// Files committed for the release
    pub updated_files: Vec<String>,

    /// Release tag created by this run
    pub tag: Option<String>,

    /// Movable major/minor tags moved by this run
    pub movable_tags: Vec<String>,

    pub pushed: bool,

    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowOutcome {
    fn warn(&mut self, reporter: &Reporter, warning: BoundaryWarning) {
        reporter.warning(&warning);
        self.warnings.push(warning);
    }

    /// Finish a run that releases nothing
    fn without_release(mut self, reporter: &Reporter, mode: NoBumpOutput) -> Self {
        self.reported_version = match mode {
            NoBumpOutput::Current => Some(self.current_version),
            NoBumpOutput::Silent => None,
        };
        if let Some(version) = self.reported_version {
            reporter.version(&version.to_string());
        }
        self
    }
}

/// Main bump workflow
///
/// Orchestrates the entire release:
/// 1. Read the current version through the configured strategy
/// 2. Realign manifests that fell behind the latest release tag
/// 3. Analyse commits since that tag and plan the release
/// 4. Rewrite manifests and changelog, commit, tag and push
///
/// # Arguments
///
/// * `repo` - Repository the release is made in
/// * `config` - Effective configuration (file plus CLI overrides)
/// * `args` - Output and remote options
/// * `root` - Working tree root; package files are relative to it
/// * `today` - Date stamped on the changelog entry (`YYYY-MM-DD`)
pub fn run_bump_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    args: &BumpWorkflowArgs,
    root: &Path,
    today: &str,
) -> Result<WorkflowOutcome> {
    let reporter = Reporter::new(args.raw, args.quiet);
    let mut outcome = WorkflowOutcome::default();

    let create_tag = config.tag && !args.raw;
    let push = config.push && !args.raw;

    if config.release_notes && !create_tag {
        outcome.warn(&reporter, BoundaryWarning::ReleaseNotesWithoutTag);
    }

    let naming = config.tag_naming();
    let latest_tag = repo
        .latest_tag(&naming)
        .context("Failed to look up the latest release tag")?;

    let tag_version = match latest_tag.as_deref().map(|tag| (tag, naming.version_of(tag))) {
        Some((_, Ok(version))) => Some(version),
        Some((tag, Err(e))) => {
            outcome.warn(
                &reporter,
                BoundaryWarning::UnparsableTag {
                    tag: tag.to_string(),
                    reason: e.to_string(),
                },
            );
            None
        }
        None => None,
    };

    let strategy = load_strategy(config, root, tag_version, args.raw)?;
    let mut current = strategy
        .current_version()
        .context("Failed to read the current version")?;

    reporter.status(&format!("Current version: {}", current));
    reporter.status(&format!(
        "Last tag: {}",
        latest_tag.as_deref().unwrap_or("none")
    ));

    if let Some(tag_version) = tag_version.filter(|v| strategy.tracks_files() && current < *v) {
        outcome.warn(
            &reporter,
            BoundaryWarning::ManifestBehindTag {
                manifest_version: current.to_string(),
                tag_version: tag_version.to_string(),
            },
        );

        let synced = strategy.update_files(&tag_version)?;
        if !synced.is_empty() {
            repo.commit_files(
                &synced,
                &format!("{} to v{}", SYNC_COMMIT_PREFIX, tag_version),
            )
            .context("Failed to commit the package version sync")?;
            reporter.success(&format!("Synced package to version {}", tag_version));
        }

        outcome.synced_to = Some(tag_version);
        current = tag_version;
    }
    outcome.current_version = current;

    let messages: Vec<String> = repo
        .commits_since(latest_tag.as_deref())
        .context("Failed to collect commits")?
        .into_iter()
        .map(|commit| commit.message)
        .filter(|message| !message.starts_with(SYNC_COMMIT_PREFIX))
        .collect();
    debug!(count = messages.len(), "commits to analyse");

    reporter.commit_list(&messages);

    if messages.is_empty() {
        reporter.status("No commits since last tag.");
        outcome.warnings.push(BoundaryWarning::NoNewCommits {
            latest_tag: latest_tag.clone(),
        });
        return Ok(outcome.without_release(&reporter, config.no_bump_output));
    }

    let analyzer = VersionAnalyzer::new(config.analysis());
    let plan = analyzer.plan(current, &messages, config.no_bump_output)?;
    outcome.bump = plan.bump();

    reporter.status(&format!(
        "Version bump: {}",
        plan.bump().as_str().to_uppercase()
    ));

    let unknown = &plan.classification.unknown_commits;
    if !unknown.is_empty() {
        outcome.warnings.push(BoundaryWarning::UnknownCommitTypes {
            count: unknown.len(),
        });
    }

    let next = match plan.next {
        Some(next) if plan.is_release() => next,
        _ => {
            reporter.status("No version bump required.");
            reporter.unknown_commits(unknown);
            return Ok(outcome.without_release(&reporter, config.no_bump_output));
        }
    };

    reporter.triggering_commits(&plan.classification.triggering_commits);
    reporter.unknown_commits(unknown);

    outcome.released = true;
    outcome.reported_version = Some(next);

    if args.raw {
        reporter.version(&next.to_string());
        return Ok(outcome);
    }

    let mut files = strategy.update_files(&next)?;
    reporter.success(&format!("Updated to {}", next));

    if config.changelog {
        changelog::write_entry(
            &root.join(CHANGELOG_FILE),
            &next,
            today,
            &messages,
            &[config.commit_prefix.as_str(), SYNC_COMMIT_PREFIX],
        )?;
        files.push(CHANGELOG_FILE.to_string());
        reporter.success(&format!("Updated {}", CHANGELOG_FILE));
    }

    if !files.is_empty() {
        repo.commit_files(&files, &format!("{} to {}", config.commit_prefix, next))
            .context("Failed to commit the release")?;
    }
    outcome.updated_files = files;

    if create_tag {
        let release_notes = (config.release_notes && !messages.is_empty()).then(|| {
            messages
                .iter()
                .map(|message| format!("- {}", crate::domain::commit::subject_of(message)))
                .collect::<Vec<_>>()
                .join("\n")
        });

        let tag_name = naming.release_tag(&next);
        repo.create_tag(&tag_name, release_notes.as_deref(), false)
            .with_context(|| format!("Failed to create tag {}", tag_name))?;
        info!(tag = %tag_name, "created release tag");
        outcome.tag = Some(tag_name);

        let mut movable = Vec::new();
        if config.update_major_tag {
            movable.push(naming.major_tag(&next));
        }
        if config.update_minor_tag {
            movable.push(naming.minor_tag(&next));
        }
        for tag in &movable {
            repo.create_tag(tag, None, true)
                .with_context(|| format!("Failed to move tag {}", tag))?;
        }
        outcome.movable_tags = movable;
    }

    if push {
        let refspecs = push_refspecs(
            repo.current_branch()?.as_deref(),
            outcome.tag.as_deref(),
            &outcome.movable_tags,
        );

        if refspecs.is_empty() {
            debug!("nothing to push");
        } else {
            repo.push(&args.remote, &refspecs)
                .with_context(|| format!("Failed to push to {}", args.remote))?;
            outcome.pushed = true;
        }
    }

    match (outcome.pushed, outcome.tag.is_some()) {
        (true, true) => reporter.success("Pushed changes and tags."),
        (true, false) => reporter.success("Pushed changes."),
        (false, true) => reporter.success("Committed and tagged locally."),
        (false, false) if !outcome.updated_files.is_empty() => {
            reporter.success("Committed locally.")
        }
        (false, false) => {}
    }

    Ok(outcome)
}

/// Refspecs for the release: the branch, the release tag, and force-updated
/// movable tags
fn push_refspecs(branch: Option<&str>, tag: Option<&str>, movable_tags: &[String]) -> Vec<String> {
    let mut refspecs = Vec::new();

    if let Some(branch) = branch {
        refspecs.push(format!("refs/heads/{0}:refs/heads/{0}", branch));
    }
    if let Some(tag) = tag {
        refspecs.push(format!("refs/tags/{0}:refs/tags/{0}", tag));
    }
    for tag in movable_tags {
        refspecs.push(format!("+refs/tags/{0}:refs/tags/{0}", tag));
    }

    refspecs
}
