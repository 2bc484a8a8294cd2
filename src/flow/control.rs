//! Request Flow Control
//!
//! Wraps a step controller with workflow navigation. For each step request
//! the caller:
//!
//! 1. Builds a [`WorkflowProcessor`] for the freshly loaded submission
//! 2. Calls [`FlowController::before`]; a returned navigation short-circuits
//!    the request (finalized submission, or stage not yet reachable)
//! 3. Runs the step controller
//! 4. Calls [`FlowController::after`] with the controller's result, which
//!    marks the stage seen and resolves where to go next
//! 5. Persists the processor's seen map
//!
//! A controller that rejects the request outright goes through
//! [`FlowController::rejected`] instead of step 4.

use log::{debug, warn};
use serde::Serialize;

use super::decision::{decide, ControllerOutcome, Method, StatusCode, UserAction, Verdict};
use crate::config::FlowConfig;
use crate::error::Result;
use crate::workflow::{Stage, WorkflowProcessor};

/// Where the request layer should send the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// Return whatever the step controller produced
    ShowResult,
    /// Redirect to a stage, optionally with a notice for the user
    Stage {
        endpoint: String,
        notice: Option<String>,
    },
    /// Leave the workflow
    Exit { endpoint: String },
}

impl Navigation {
    /// Endpoint of a redirect, `None` for [`Navigation::ShowResult`].
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Navigation::ShowResult => None,
            Navigation::Stage { endpoint, .. } | Navigation::Exit { endpoint } => Some(endpoint.as_str()),
        }
    }
}

/// What a step controller reported for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub method: Method,
    pub action: Option<UserAction>,
    pub code: StatusCode,
    pub outcome: Option<ControllerOutcome>,
}

impl StepResult {
    pub fn new(method: Method, code: StatusCode) -> Self {
        Self {
            method,
            action: None,
            code,
            outcome: None,
        }
    }

    pub fn with_action(mut self, action: Option<UserAction>) -> Self {
        self.action = action;
        self
    }

    pub fn with_outcome(mut self, outcome: ControllerOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

/// Turns workflow state and controller results into navigation.
#[derive(Debug, Clone, Default)]
pub struct FlowController {
    config: FlowConfig,
}

impl FlowController {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Guards a step before its controller runs.
    ///
    /// Finalized submissions are sent to the confirmation stage; stages that
    /// are not reachable yet redirect to the current stage. `None` means the
    /// controller may run.
    pub fn before(&self, processor: &WorkflowProcessor<'_>, stage: &Stage) -> Result<Option<Navigation>> {
        let workflow = processor.workflow();

        if processor.complete() {
            if workflow.is_confirmation(stage) {
                return Ok(None);
            }
            warn!(
                "Submission {} is finalized; '{}' redirected to confirmation",
                processor.submission().submission_id,
                stage.endpoint()
            );
            return Ok(Some(self.to_stage(Some(workflow.confirmation()), None)));
        }

        if !processor.can_proceed_to(stage)? {
            warn!(
                "Submission {} cannot proceed to '{}' yet",
                processor.submission().submission_id,
                stage.endpoint()
            );
            return Ok(Some(self.to_current(processor, true)));
        }

        Ok(None)
    }

    /// Marks the stage seen and resolves the controller's result.
    ///
    /// The stage is marked seen whatever the method or outcome, so visiting
    /// a must-see stage counts even when its form failed validation.
    pub fn after(
        &self,
        processor: &mut WorkflowProcessor<'_>,
        stage: &Stage,
        result: &StepResult,
    ) -> Result<Navigation> {
        processor.workflow().position(stage)?;
        processor.mark_seen(Some(stage));

        let verdict = decide(&result.method, result.action, result.code, result.outcome);
        let navigation = match verdict {
            Verdict::ShowResult => Navigation::ShowResult,
            Verdict::RedirectNext if result.outcome == Some(ControllerOutcome::Current) => {
                self.to_current(processor, false)
            }
            Verdict::RedirectNext => self.to_stage(processor.next_stage(Some(stage))?, None),
            Verdict::RedirectPrevious => {
                self.to_stage(processor.previous_stage(Some(stage))?, None)
            }
            Verdict::RedirectExit => self.exit(),
            Verdict::RedirectParent => self.to_stage(Some(stage), None),
        };

        debug!("'{}': {:?} -> {:?}", stage.endpoint(), verdict, navigation);
        Ok(navigation)
    }

    /// Handles a controller that rejected the request (e.g. a malformed form).
    ///
    /// Going back still works; any other action returns `None` and the
    /// caller surfaces the error.
    pub fn rejected(
        &self,
        processor: &WorkflowProcessor<'_>,
        stage: &Stage,
        action: Option<UserAction>,
    ) -> Result<Option<Navigation>> {
        if action != Some(UserAction::Previous) {
            return Ok(None);
        }
        debug!("'{}' rejected; going back anyway", stage.endpoint());
        Ok(Some(self.to_stage(processor.previous_stage(Some(stage))?, None)))
    }

    fn to_stage(&self, stage: Option<&Stage>, notice: Option<String>) -> Navigation {
        match stage {
            Some(stage) => Navigation::Stage {
                endpoint: stage.endpoint().to_string(),
                notice,
            },
            None => self.exit(),
        }
    }

    fn to_current(&self, processor: &WorkflowProcessor<'_>, notify: bool) -> Navigation {
        let current = processor.current_stage();
        let notice = current
            .filter(|_| notify && self.config.notify_blocked)
            .map(|stage| format!("Please {} before proceeding.", stage.label()));
        self.to_stage(current, notice)
    }

    fn exit(&self) -> Navigation {
        Navigation::Exit {
            endpoint: self.config.exit_endpoint.clone(),
        }
    }
}
