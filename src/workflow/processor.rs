//! Workflow Processor
//!
//! Binds a workflow definition to one submission snapshot and the caller's
//! seen-map for the length of a single request.
//!
//! There is no stored "current stage". Position in the workflow is derived
//! from the snapshot and the seen-map on every call, so a submission edited
//! out of band is always evaluated as it actually is.

use log::debug;

use super::builtin::select_workflow;
use super::definition::WorkflowDefinition;
use super::seen::SeenSteps;
use super::stage::Stage;
use crate::error::Result;
use crate::submission::Submission;

/// Evaluates one submission against one workflow.
///
/// # Example
///
/// ```
/// use submitflow::submission::Submission;
/// use submitflow::workflow::{SeenSteps, StageKind, WorkflowProcessor};
///
/// let submission = Submission::new(1);
/// let mut seen = SeenSteps::new();
/// let processor = WorkflowProcessor::for_submission(&submission, &mut seen);
///
/// let current = processor.current_stage().unwrap();
/// assert_eq!(current.kind, StageKind::VerifyUser);
/// ```
#[derive(Debug)]
pub struct WorkflowProcessor<'a> {
    workflow: &'a WorkflowDefinition,
    submission: &'a Submission,
    seen: &'a mut SeenSteps,
}

impl<'a> WorkflowProcessor<'a> {
    pub fn new(
        workflow: &'a WorkflowDefinition,
        submission: &'a Submission,
        seen: &'a mut SeenSteps,
    ) -> Self {
        Self {
            workflow,
            submission,
            seen,
        }
    }

    /// Creates a processor for the workflow [`select_workflow`] picks.
    pub fn for_submission(submission: &'a Submission, seen: &'a mut SeenSteps) -> Self {
        Self::new(select_workflow(submission), submission, seen)
    }

    pub fn workflow(&self) -> &'a WorkflowDefinition {
        self.workflow
    }

    pub fn submission(&self) -> &'a Submission {
        self.submission
    }

    pub fn seen(&self) -> &SeenSteps {
        self.seen
    }

    /// True once the submission is finalized; the whole workflow is over
    /// regardless of what has been seen.
    pub fn complete(&self) -> bool {
        self.submission.is_finalized
    }

    /// Whether the stage's completion check passes. `None` counts as complete.
    pub fn is_complete(&self, stage: Option<&Stage>) -> bool {
        stage.map_or(true, |stage| stage.is_complete(self.submission))
    }

    /// Whether the user has visited the stage. `None` counts as seen.
    pub fn is_seen(&self, stage: Option<&Stage>) -> bool {
        stage.map_or(true, |stage| self.seen.is_seen(stage.endpoint()))
    }

    /// Whether the stage is sufficiently addressed for this workflow.
    ///
    /// Required stages must be complete and must-see stages must have been
    /// seen. An optional, complete, not must-see stage is always done; a
    /// complete must-see stage is not done until visited.
    pub fn is_done(&self, stage: Option<&Stage>) -> bool {
        let Some(stage) = stage else {
            return true;
        };
        (!stage.required || stage.is_complete(self.submission))
            && (!stage.must_see || self.seen.is_seen(stage.endpoint()))
    }

    /// The first stage that is not done, or `None` when every stage is.
    pub fn current_stage(&self) -> Option<&'a Stage> {
        self.workflow
            .stages()
            .find(|stage| !self.is_done(Some(*stage)))
    }

    /// Whether the user may navigate to `stage` now.
    ///
    /// Allowed when the previous stage is done, when the previous stage is
    /// optional and everything before it is done, or when everything before
    /// `stage` is done. The first stage is always reachable.
    pub fn can_proceed_to(&self, stage: &Stage) -> Result<bool> {
        let previous = self.workflow.previous_stage(Some(stage))?;
        if self.is_done(previous) {
            return Ok(true);
        }

        if let Some(previous) = previous {
            if previous.is_optional() && self.all_done(self.workflow.iter_prior(previous)?) {
                debug!(
                    "Optional stage '{}' skipped on the way to '{}'",
                    previous.endpoint(),
                    stage.endpoint()
                );
                return Ok(true);
            }
        }

        Ok(self.all_done(self.workflow.iter_prior(stage)?))
    }

    fn all_done<'s>(&self, mut stages: impl Iterator<Item = &'s Stage>) -> bool {
        stages.all(|stage| self.is_done(Some(stage)))
    }

    /// Records a visit to the stage. No-op for `None`.
    pub fn mark_seen(&mut self, stage: Option<&Stage>) {
        if let Some(stage) = stage {
            debug!("Marking stage '{}' as seen", stage.endpoint());
            self.seen.mark(stage.endpoint());
        }
    }

    /// The stage after `stage` in this workflow.
    pub fn next_stage(&self, stage: Option<&Stage>) -> Result<Option<&'a Stage>> {
        self.workflow.next_stage(stage)
    }

    /// The stage before `stage` in this workflow.
    pub fn previous_stage(&self, stage: Option<&Stage>) -> Result<Option<&'a Stage>> {
        self.workflow.previous_stage(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{Classification, License, SourceContent, SourceFormat};
    use crate::workflow::builtin::{REPLACEMENT_WORKFLOW, SUBMISSION_WORKFLOW};
    use crate::workflow::stage::StageKind;

    fn stage(kind: StageKind) -> &'static Stage {
        SUBMISSION_WORKFLOW.get(kind).unwrap()
    }

    fn reachable(submission: &Submission, seen: &mut SeenSteps, kind: StageKind) -> bool {
        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, submission, seen);
        processor.can_proceed_to(stage(kind)).unwrap()
    }

    /// Submission with every required new-submission stage complete.
    fn complete_submission() -> Submission {
        let mut submission = Submission::new(1);
        submission.submitter_contact_verified = true;
        submission.submitter_is_author = Some(true);
        submission.license = Some(License {
            uri: "http://arxiv.org/licenses/nonexclusive-distrib/1.0/".to_string(),
            name: None,
        });
        submission.submitter_accepts_policy = true;
        submission.primary_classification = Some(Classification::new("math.CO"));
        submission.source_content = Some(SourceContent {
            checksum: Some("deadbeef".to_string()),
            source_format: Some(SourceFormat::Pdf),
            uncompressed_size: 2048,
        });
        submission.metadata.title = Some("Counting things".to_string());
        submission.metadata.abstract_text = Some("We count.".to_string());
        submission.metadata.authors_display = Some("C. Ounter".to_string());
        submission
    }

    #[test]
    fn test_none_stage_is_trivially_done() {
        let submission = Submission::default();
        let mut seen = SeenSteps::new();
        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        assert!(processor.is_complete(None));
        assert!(processor.is_seen(None));
        assert!(processor.is_done(None));
    }

    #[test]
    fn test_fresh_submission_starts_at_verify_user() {
        let submission = Submission::new(1);
        let mut seen = SeenSteps::new();
        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);

        assert_eq!(processor.current_stage(), Some(stage(StageKind::VerifyUser)));
        assert!(processor.can_proceed_to(stage(StageKind::VerifyUser)).unwrap());
        for kind in StageKind::ALL.iter().skip(1) {
            assert!(
                !processor.can_proceed_to(stage(*kind)).unwrap(),
                "{} should not be reachable",
                kind
            );
        }
    }

    #[test]
    fn test_contact_verified_moves_to_authorship() {
        let mut submission = Submission::new(1);
        submission.submitter_contact_verified = true;
        let mut seen = SeenSteps::new();

        {
            let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
            assert_eq!(processor.current_stage(), Some(stage(StageKind::Authorship)));
        }
        assert!(reachable(&submission, &mut seen, StageKind::Authorship));
        assert!(!reachable(&submission, &mut seen, StageKind::License));

        submission.submitter_is_author = Some(false);
        assert!(reachable(&submission, &mut seen, StageKind::License));
        assert!(!reachable(&submission, &mut seen, StageKind::Policy));
    }

    fn satisfy(kind: StageKind, submission: &mut Submission) {
        match kind {
            StageKind::VerifyUser => submission.submitter_contact_verified = true,
            StageKind::Authorship => submission.submitter_is_author = Some(true),
            StageKind::License => {
                submission.license = Some(License {
                    uri: "http://creativecommons.org/licenses/by/4.0/".to_string(),
                    name: None,
                })
            }
            StageKind::Policy => submission.submitter_accepts_policy = true,
            StageKind::Classification => {
                submission.primary_classification = Some(Classification::new("physics.optics"))
            }
            other => panic!("no test data for {}", other),
        }
    }

    #[test]
    fn test_walk_through_new_submission() {
        let mut submission = Submission::new(1);
        let mut seen = SeenSteps::new();

        for kind in [
            StageKind::VerifyUser,
            StageKind::Authorship,
            StageKind::License,
            StageKind::Policy,
            StageKind::Classification,
        ] {
            {
                let processor =
                    WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
                assert_eq!(processor.current_stage(), Some(stage(kind)));
            }
            satisfy(kind, &mut submission);
            let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
            processor.mark_seen(Some(stage(kind)));
            let next = processor.next_stage(Some(stage(kind))).unwrap().unwrap();
            assert!(processor.can_proceed_to(next).unwrap());
        }

        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        assert_eq!(processor.current_stage(), Some(stage(StageKind::CrossList)));
    }

    #[test]
    fn test_cross_list_done_once_seen() {
        let submission = complete_submission();
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        let cross = stage(StageKind::CrossList);

        assert!(!processor.is_complete(Some(cross)));
        assert!(!processor.is_done(Some(cross)));
        assert_eq!(processor.current_stage(), Some(cross));

        processor.mark_seen(Some(cross));
        assert!(processor.is_done(Some(cross)));
        assert!(!processor.is_complete(Some(cross)));
        assert_eq!(processor.current_stage(), Some(stage(StageKind::OptionalMetadata)));
    }

    #[test]
    fn test_must_see_gates_complete_stage() {
        let mut submission = complete_submission();
        submission.secondary_classification.push(Classification::new("math.PR"));
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        let cross = stage(StageKind::CrossList);

        assert!(processor.is_complete(Some(cross)));
        assert!(!processor.is_done(Some(cross)));
        processor.mark_seen(Some(cross));
        assert!(processor.is_done(Some(cross)));
        assert!(seen.is_seen("cross_list"));
    }

    #[test]
    fn test_optional_not_must_see_always_done() {
        let wf = WorkflowDefinition::new(
            "Optional",
            vec![
                Stage::new(StageKind::CrossList).with_required(false),
                Stage::new(StageKind::OptionalMetadata).with_required(false),
                Stage::new(StageKind::Confirm).with_required(false),
            ],
            StageKind::Confirm,
        )
        .unwrap();

        for submission in [Submission::default(), complete_submission()] {
            let mut seen = SeenSteps::new();
            let processor = WorkflowProcessor::new(&wf, &submission, &mut seen);
            assert!(wf.stages().all(|s| processor.is_done(Some(s))));
            assert_eq!(processor.current_stage(), None);
        }
    }

    #[test]
    fn test_current_stage_is_first_not_done() {
        let submission = complete_submission();
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);

        processor.mark_seen(Some(stage(StageKind::CrossList)));
        processor.mark_seen(Some(stage(StageKind::OptionalMetadata)));
        // Only the final preview (not finalized) is left
        assert_eq!(processor.current_stage(), Some(stage(StageKind::FinalPreview)));

        let first_not_done = SUBMISSION_WORKFLOW
            .stages()
            .find(|s| !processor.is_done(Some(*s)));
        assert_eq!(processor.current_stage(), first_not_done);
    }

    #[test]
    fn test_finalized_submission_is_finished() {
        let mut submission = complete_submission();
        submission.is_finalized = true;
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        processor.mark_seen(Some(stage(StageKind::CrossList)));
        processor.mark_seen(Some(stage(StageKind::OptionalMetadata)));

        assert!(processor.complete());
        assert_eq!(processor.current_stage(), None);
        assert!(processor.can_proceed_to(SUBMISSION_WORKFLOW.confirmation()).unwrap());
    }

    #[test]
    fn test_first_stage_always_reachable() {
        for submission in [Submission::default(), complete_submission()] {
            for wf in [&*SUBMISSION_WORKFLOW, &*REPLACEMENT_WORKFLOW] {
                let mut seen = SeenSteps::new();
                let processor = WorkflowProcessor::new(wf, &submission, &mut seen);
                assert!(processor.can_proceed_to(&wf.order()[0]).unwrap());
            }
        }
    }

    #[test]
    fn test_skip_unseen_optional_stage() {
        // Cross-list is optional: with everything before it done, the user
        // may move past it without visiting it.
        let mut submission = complete_submission();
        submission.source_content = None;
        let mut seen = SeenSteps::new();
        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);

        assert!(!processor.is_done(Some(stage(StageKind::CrossList))));
        assert!(processor.can_proceed_to(stage(StageKind::FileUpload)).unwrap());
        // The required upload in between is not done
        assert!(!processor.can_proceed_to(stage(StageKind::Process)).unwrap());
        assert_eq!(processor.current_stage(), Some(stage(StageKind::CrossList)));
    }

    #[test]
    fn test_previous_done_is_enough() {
        // Previous stage done, earlier required stage not done
        let mut submission = Submission::new(1);
        submission.submitter_accepts_policy = true;
        let mut seen = SeenSteps::new();
        let processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);

        assert!(processor.can_proceed_to(stage(StageKind::Classification)).unwrap());
        assert!(!processor.can_proceed_to(stage(StageKind::CrossList)).unwrap());
    }

    #[test]
    fn test_foreign_stage_is_an_error() {
        let submission = Submission::new(1);
        let mut seen = SeenSteps::new();
        let processor = WorkflowProcessor::new(&REPLACEMENT_WORKFLOW, &submission, &mut seen);
        assert!(processor.can_proceed_to(stage(StageKind::Classification)).is_err());
    }

    #[test]
    fn test_replacement_requires_every_stage_seen() {
        let mut submission = complete_submission();
        submission.version = 2;
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::for_submission(&submission, &mut seen);

        assert_eq!(processor.workflow().name(), "ReplacementWorkflow");
        let verify = processor.workflow().get(StageKind::VerifyUser).unwrap();
        assert!(processor.is_complete(Some(verify)));
        assert_eq!(processor.current_stage(), Some(verify));

        processor.mark_seen(Some(verify));
        let authorship = processor.workflow().get(StageKind::Authorship).unwrap();
        assert_eq!(processor.current_stage(), Some(authorship));
    }

    #[test]
    fn test_mark_seen_none_is_noop() {
        let submission = Submission::new(1);
        let mut seen = SeenSteps::new();
        let mut processor = WorkflowProcessor::new(&SUBMISSION_WORKFLOW, &submission, &mut seen);
        processor.mark_seen(None);
        assert!(processor.seen().is_empty());
    }
}
