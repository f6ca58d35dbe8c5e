//! Release workflow driven by the `bump` binary

pub mod orchestration;

pub use orchestration::{run_bump_workflow, BumpWorkflowArgs, WorkflowOutcome, DEFAULT_REMOTE};
