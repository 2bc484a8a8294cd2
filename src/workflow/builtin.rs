//! Built-in Workflows
//!
//! The new-submission and replacement pipelines, and the rule choosing
//! between them.

use once_cell::sync::Lazy;

use super::definition::WorkflowDefinition;
use super::stage::{Stage, StageKind};
use crate::submission::Submission;

/// Workflow for new submissions.
pub static SUBMISSION_WORKFLOW: Lazy<WorkflowDefinition> = Lazy::new(|| {
    WorkflowDefinition::new(
        "SubmissionWorkflow",
        vec![
            Stage::new(StageKind::VerifyUser),
            Stage::new(StageKind::Authorship),
            Stage::new(StageKind::License),
            Stage::new(StageKind::Policy),
            Stage::new(StageKind::Classification),
            Stage::new(StageKind::CrossList)
                .with_required(false)
                .with_must_see(true),
            Stage::new(StageKind::FileUpload),
            Stage::new(StageKind::Process),
            Stage::new(StageKind::Metadata),
            Stage::new(StageKind::OptionalMetadata)
                .with_required(false)
                .with_must_see(true),
            Stage::new(StageKind::FinalPreview),
            Stage::new(StageKind::Confirm).with_required(false),
        ],
        StageKind::Confirm,
    )
    .expect("built-in submission workflow must be valid")
});

/// Workflow for replacements: every stage must be revisited, and the
/// classification stages are fixed by the first version.
pub static REPLACEMENT_WORKFLOW: Lazy<WorkflowDefinition> = Lazy::new(|| {
    WorkflowDefinition::new(
        "ReplacementWorkflow",
        vec![
            Stage::new(StageKind::VerifyUser).with_must_see(true),
            Stage::new(StageKind::Authorship).with_must_see(true),
            Stage::new(StageKind::License).with_must_see(true),
            Stage::new(StageKind::Policy).with_must_see(true),
            Stage::new(StageKind::FileUpload).with_must_see(true),
            Stage::new(StageKind::Process).with_must_see(true),
            Stage::new(StageKind::Metadata).with_must_see(true),
            Stage::new(StageKind::OptionalMetadata)
                .with_required(false)
                .with_must_see(true),
            Stage::new(StageKind::FinalPreview).with_must_see(true),
            Stage::new(StageKind::Confirm).with_required(false),
        ],
        StageKind::Confirm,
    )
    .expect("built-in replacement workflow must be valid")
});

/// Chooses the workflow for a submission: replacements (version > 1) get
/// the replacement workflow.
pub fn select_workflow(submission: &Submission) -> &'static WorkflowDefinition {
    if submission.is_replacement() {
        &REPLACEMENT_WORKFLOW
    } else {
        &SUBMISSION_WORKFLOW
    }
}
