//! Analysis engine for determining version bumps from commits
//!
//! The pipeline is classify -> aggregate -> bump. Every stage is a pure
//! function of its inputs.

pub mod aggregator;
pub mod classifier;
pub mod version_analyzer;

pub use aggregator::aggregate;
pub use classifier::{
    analyse_commits, Classification, ClassificationResult, CommitClassifier, CommitDecision,
};
pub use version_analyzer::{plan_release, NoBumpOutput, ReleasePlan, VersionAnalyzer};
