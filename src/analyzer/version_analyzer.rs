use crate::analyzer::classifier::{analyse_commits, ClassificationResult};
use crate::config::AnalysisConfig;
use crate::domain::{BumpLevel, Version};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// What to report when the commits call for no bump.
///
/// Covers both "nothing substantive since the last tag" and "only commits
/// that map to `none`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoBumpOutput {
    /// Report the unchanged current version
    #[default]
    Current,
    /// Report nothing
    Silent,
}

/// Current version, commit analysis and the resulting next version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub current: Version,
    pub classification: ClassificationResult,
    /// `None` only when no bump is needed and the output mode is silent
    pub next: Option<Version>,
}

impl ReleasePlan {
    /// Combine a classification with the current version
    pub fn new(
        current: Version,
        classification: ClassificationResult,
        no_bump: NoBumpOutput,
    ) -> Result<Self> {
        let next = match (classification.bump, no_bump) {
            (BumpLevel::None, NoBumpOutput::Current) => Some(current),
            (BumpLevel::None, NoBumpOutput::Silent) => None,
            (level, _) => Some(current.bump(level)?),
        };

        Ok(ReleasePlan {
            current,
            classification,
            next,
        })
    }

    pub fn bump(&self) -> BumpLevel {
        self.classification.bump
    }

    /// A new version will be released
    pub fn is_release(&self) -> bool {
        self.bump() != BumpLevel::None
    }
}

/// Analyzes commits to determine the version bump
#[derive(Debug, Clone, Default)]
pub struct VersionAnalyzer {
    config: AnalysisConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: AnalysisConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Analyze commit messages and determine the version bump
    pub fn analyze_messages<S: AsRef<str>>(&self, messages: &[S]) -> ClassificationResult {
        analyse_commits(messages, &self.config)
    }

    /// Run the whole pipeline against an already parsed version
    pub fn plan<S: AsRef<str>>(
        &self,
        current: Version,
        messages: &[S],
        no_bump: NoBumpOutput,
    ) -> Result<ReleasePlan> {
        ReleasePlan::new(current, self.analyze_messages(messages), no_bump)
    }
}

/// Parse `current_version`, analyse `commits` and compute the next version.
///
/// Fails fast with `InvalidVersion` before any bump is applied.
pub fn plan_release<S: AsRef<str>>(
    current_version: &str,
    commits: &[S],
    config: &AnalysisConfig,
    no_bump: NoBumpOutput,
) -> Result<ReleasePlan> {
    let current = Version::parse(current_version)?;
    ReleasePlan::new(current, analyse_commits(commits, config), no_bump)
}
