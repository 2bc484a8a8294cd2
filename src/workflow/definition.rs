//! Workflow Definitions
//!
//! An ordered list of stages plus a designated confirmation stage. Order is
//! the pipeline order. Definitions are validated once at construction and are
//! immutable afterwards.

use std::collections::HashSet;
use std::slice;

use log::{debug, info, warn};

use super::stage::{Stage, StageKind};
use crate::error::{FlowError, Result};

/// Ways of looking a stage up in a workflow.
#[derive(Debug, Clone, Copy)]
pub enum StageQuery<'q> {
    /// A stage instance; matches the workflow's own instance of it
    Stage(&'q Stage),
    /// The (only) stage of this kind
    Kind(StageKind),
    /// An endpoint, kind name or label
    Name(&'q str),
    /// Position in the stage order
    Index(usize),
}

impl<'q> From<&'q Stage> for StageQuery<'q> {
    fn from(stage: &'q Stage) -> Self {
        StageQuery::Stage(stage)
    }
}

impl From<StageKind> for StageQuery<'_> {
    fn from(kind: StageKind) -> Self {
        StageQuery::Kind(kind)
    }
}

impl<'q> From<&'q str> for StageQuery<'q> {
    fn from(name: &'q str) -> Self {
        StageQuery::Name(name)
    }
}

impl From<usize> for StageQuery<'_> {
    fn from(index: usize) -> Self {
        StageQuery::Index(index)
    }
}

/// A named, ordered pipeline of stages.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    name: String,
    order: Vec<Stage>,
    confirmation: usize,
}

impl WorkflowDefinition {
    /// Builds and validates a workflow.
    ///
    /// Fails when `order` is empty, when a stage kind appears twice, or when
    /// no stage of the `confirmation` kind is in `order`.
    pub fn new(name: impl Into<String>, order: Vec<Stage>, confirmation: StageKind) -> Result<Self> {
        let name = name.into();

        if order.is_empty() {
            return Err(FlowError::EmptyWorkflow(name));
        }

        let mut kinds = HashSet::new();
        for stage in &order {
            if !kinds.insert(stage.kind) {
                return Err(FlowError::DuplicateStage {
                    workflow: name,
                    endpoint: stage.endpoint().to_string(),
                });
            }
        }

        let confirmation = order
            .iter()
            .position(|stage| stage.kind == confirmation)
            .ok_or_else(|| FlowError::ConfirmationNotInOrder {
                workflow: name.clone(),
                endpoint: confirmation.endpoint().to_string(),
            })?;

        if confirmation + 1 != order.len() {
            warn!(
                "Workflow '{}': confirmation stage is not the last stage",
                name
            );
        }

        info!("Defined workflow '{}' with {} stages", name, order.len());
        Ok(Self {
            name,
            order,
            confirmation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All stages in pipeline order.
    pub fn order(&self) -> &[Stage] {
        &self.order
    }

    /// Iterates over stages in pipeline order.
    pub fn stages(&self) -> slice::Iter<'_, Stage> {
        self.order.iter()
    }

    /// The terminal stage.
    pub fn confirmation(&self) -> &Stage {
        &self.order[self.confirmation]
    }

    pub fn is_confirmation(&self, stage: &Stage) -> bool {
        matches!(self.position(stage), Ok(idx) if idx == self.confirmation)
    }

    /// Returns the number of stages in the workflow.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false for a constructed definition.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if `stage` is one of this workflow's own stage instances.
    pub fn contains(&self, stage: &Stage) -> bool {
        self.find_position(stage).is_some()
    }

    /// Position of a stage in the order; foreign stages are an error.
    pub fn position(&self, stage: &Stage) -> Result<usize> {
        self.find_position(stage).ok_or_else(|| {
            warn!(
                "Stage '{}' queried against workflow '{}'",
                stage.endpoint(),
                self.name
            );
            FlowError::ForeignStage {
                workflow: self.name.clone(),
                endpoint: stage.endpoint().to_string(),
            }
        })
    }

    /// Ordering queries go by instance: an identically configured stage
    /// from another workflow is still foreign.
    fn find_position(&self, stage: &Stage) -> Option<usize> {
        self.order.iter().position(|own| std::ptr::eq(own, stage))
    }

    /// The stage after `stage`, or `None` if it is last or absent.
    pub fn next_stage(&self, stage: Option<&Stage>) -> Result<Option<&Stage>> {
        let Some(stage) = stage else {
            return Ok(None);
        };
        let idx = self.position(stage)?;
        Ok(self.order.get(idx + 1))
    }

    /// The stage before `stage`, or `None` if it is first or absent.
    pub fn previous_stage(&self, stage: Option<&Stage>) -> Result<Option<&Stage>> {
        let Some(stage) = stage else {
            return Ok(None);
        };
        let idx = self.position(stage)?;
        Ok(idx.checked_sub(1).map(|prev| &self.order[prev]))
    }

    /// Every stage strictly before `stage`, in order.
    ///
    /// Each call returns a fresh iterator.
    pub fn iter_prior(&self, stage: &Stage) -> Result<slice::Iter<'_, Stage>> {
        let idx = self.position(stage)?;
        Ok(self.order[..idx].iter())
    }

    /// Looks a stage up by instance, kind, name or index.
    ///
    /// A stage query also matches an identically configured stage, returning
    /// this workflow's own instance. Misses return `None`. Names match an endpoint, a kind name such as
    /// `VerifyUser`, or a stage label.
    ///
    /// ```
    /// use submitflow::workflow::{StageKind, SUBMISSION_WORKFLOW};
    ///
    /// let workflow = &*SUBMISSION_WORKFLOW;
    /// let by_kind = workflow.get(StageKind::Policy).unwrap();
    /// let by_endpoint = workflow.get("policy").unwrap();
    /// let by_index = workflow.get(3usize).unwrap();
    /// assert!(std::ptr::eq(by_kind, by_endpoint));
    /// assert!(std::ptr::eq(by_kind, by_index));
    /// assert!(workflow.get("no_such_stage").is_none());
    /// ```
    pub fn get<'q>(&self, query: impl Into<StageQuery<'q>>) -> Option<&Stage> {
        let query = query.into();
        let found = match query {
            StageQuery::Stage(stage) => self
                .find_position(stage)
                .or_else(|| self.order.iter().position(|own| own == stage))
                .map(|idx| &self.order[idx]),
            StageQuery::Kind(kind) => self.order.iter().find(|stage| stage.kind == kind),
            StageQuery::Name(name) => self.order.iter().find(|stage| {
                stage.endpoint() == name || stage.kind.name() == name || stage.label() == name
            }),
            StageQuery::Index(idx) => self.order.get(idx),
        };

        if found.is_none() {
            debug!("Workflow '{}': no stage for {:?}", self.name, query);
        }
        found
    }
}

impl<'a> IntoIterator for &'a WorkflowDefinition {
    type Item = &'a Stage;
    type IntoIter = slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
