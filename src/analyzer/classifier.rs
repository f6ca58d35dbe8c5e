use crate::analyzer::aggregator::aggregate;
use crate::config::AnalysisConfig;
use crate::domain::commit::{mentions_breaking_change, subject_of};
use crate::domain::{parse_subject, BumpLevel};

/// The bump decision for a single commit that matched the subject grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDecision {
    pub r#type: String,
    pub level: BumpLevel,
    pub breaking: bool,
    /// The type was present in the mapping (breaking commits count as known)
    pub known_type: bool,
}

/// Per-commit decisions plus the labeled commit lists, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub decisions: Vec<CommitDecision>,
    pub triggering_commits: Vec<String>,
    pub unknown_commits: Vec<String>,
}

impl Classification {
    /// Fold the per-commit decisions into the overall result
    pub fn into_result(self) -> ClassificationResult {
        ClassificationResult {
            bump: aggregate(self.decisions.iter().map(|d| d.level)),
            triggering_commits: self.triggering_commits,
            unknown_commits: self.unknown_commits,
        }
    }
}

/// Outcome of analysing a list of commits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    pub bump: BumpLevel,
    /// "Label: message" for every commit whose decision is not `none`
    pub triggering_commits: Vec<String>,
    /// Raw messages whose type is absent from the mapping
    pub unknown_commits: Vec<String>,
}

/// Classifies commit messages against an explicit analysis configuration
#[derive(Debug, Clone, Copy)]
pub struct CommitClassifier<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> CommitClassifier<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        CommitClassifier { config }
    }

    /// Self-generated bump commits are never classified.
    /// An empty exclusion prefix excludes nothing.
    pub fn is_excluded(&self, message: &str) -> bool {
        let prefix = self.config.exclusion_prefix.as_str();
        !prefix.is_empty() && subject_of(message).starts_with(prefix)
    }

    /// Decide the bump for one commit, or `None` if its subject does not
    /// follow the grammar
    pub fn decide(&self, message: &str) -> Option<CommitDecision> {
        let subject = parse_subject(subject_of(message))?;
        let breaking = subject.breaking || mentions_breaking_change(message);

        let (level, known_type) = if breaking {
            (BumpLevel::Major, true)
        } else {
            match self.config.type_mapping.get(subject.r#type) {
                Some(level) => (level, true),
                None => (BumpLevel::None, false),
            }
        };

        Some(CommitDecision {
            r#type: subject.r#type.to_string(),
            level,
            breaking,
            known_type,
        })
    }

    pub fn classify<S: AsRef<str>>(&self, commits: &[S]) -> Classification {
        let mut classification = Classification::default();

        let substantive: Vec<&str> = commits
            .iter()
            .map(|message| message.as_ref())
            .filter(|message| !self.is_excluded(message))
            .collect();

        for message in substantive {
            let Some(decision) = self.decide(message) else {
                continue;
            };

            if !decision.known_type {
                classification.unknown_commits.push(message.to_string());
            }

            if decision.level != BumpLevel::None {
                classification
                    .triggering_commits
                    .push(format!("{}: {}", decision.level.label(), message));
            }

            classification.decisions.push(decision);
        }

        classification
    }
}

/// Classify commits and aggregate them into a single result
pub fn analyse_commits<S: AsRef<str>>(
    commits: &[S],
    config: &AnalysisConfig,
) -> ClassificationResult {
    CommitClassifier::new(config).classify(commits).into_result()
}
