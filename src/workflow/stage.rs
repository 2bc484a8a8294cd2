//! Workflow Stages
//!
//! A stage is one step of the submission pipeline: a stage kind (which
//! fixes its endpoint and human-readable text), a completion check, and
//! two flags configured per workflow.
//!
//! ```
//! use submitflow::workflow::{Stage, StageKind};
//!
//! let cross_list = Stage::new(StageKind::CrossList)
//!     .with_required(false)
//!     .with_must_see(true);
//! assert_eq!(cross_list.endpoint(), "cross_list");
//! assert!(cross_list.is_optional());
//! ```

use std::fmt;

use super::conditions::{self, CompletionCheck};
use crate::submission::Submission;

/// The kinds of stage a submission workflow can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    VerifyUser,
    Authorship,
    License,
    Policy,
    Classification,
    CrossList,
    FileUpload,
    Process,
    Metadata,
    OptionalMetadata,
    FinalPreview,
    Confirm,
}

impl StageKind {
    /// Every stage kind, in new-submission pipeline order.
    pub const ALL: [StageKind; 12] = [
        StageKind::VerifyUser,
        StageKind::Authorship,
        StageKind::License,
        StageKind::Policy,
        StageKind::Classification,
        StageKind::CrossList,
        StageKind::FileUpload,
        StageKind::Process,
        StageKind::Metadata,
        StageKind::OptionalMetadata,
        StageKind::FinalPreview,
        StageKind::Confirm,
    ];

    /// Stable route key; also the key used in the seen map.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::VerifyUser => "verify_user",
            Self::Authorship => "authorship",
            Self::License => "license",
            Self::Policy => "policy",
            Self::Classification => "classification",
            Self::CrossList => "cross_list",
            Self::FileUpload => "file_upload",
            Self::Process => "file_process",
            Self::Metadata => "add_metadata",
            Self::OptionalMetadata => "add_optional_metadata",
            Self::FinalPreview => "final_preview",
            Self::Confirm => "confirmation",
        }
    }

    /// Type-style name, e.g. `VerifyUser`.
    pub fn name(self) -> &'static str {
        match self {
            Self::VerifyUser => "VerifyUser",
            Self::Authorship => "Authorship",
            Self::License => "License",
            Self::Policy => "Policy",
            Self::Classification => "Classification",
            Self::CrossList => "CrossList",
            Self::FileUpload => "FileUpload",
            Self::Process => "Process",
            Self::Metadata => "Metadata",
            Self::OptionalMetadata => "OptionalMetadata",
            Self::FinalPreview => "FinalPreview",
            Self::Confirm => "Confirm",
        }
    }

    /// Phrase completing "Please ... before proceeding."
    pub fn label(self) -> &'static str {
        match self {
            Self::VerifyUser => "verify your personal information",
            Self::Authorship => "confirm authorship",
            Self::License => "choose a license",
            Self::Policy => "accept arXiv submission policies",
            Self::Classification => "select a primary category",
            Self::CrossList => "add cross-list categories",
            Self::FileUpload => "upload your submission files",
            Self::Process => "process your submission files",
            Self::Metadata => "add required metadata",
            Self::OptionalMetadata => "add optional metadata",
            Self::FinalPreview => "preview and approve your submission",
            Self::Confirm => "your submission is confirmed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::VerifyUser => "Verify user info",
            Self::Authorship => "Confirm authorship",
            Self::License => "Choose license",
            Self::Policy => "Acknowledge policy",
            Self::Classification => "Choose category",
            Self::CrossList => "Add cross-list",
            Self::FileUpload => "File upload",
            Self::Process => "File process",
            Self::Metadata => "Add metadata",
            Self::OptionalMetadata => "Add optional metadata",
            Self::FinalPreview => "Final preview",
            Self::Confirm => "Submission confirmed",
        }
    }

    /// Short text for progress indicators.
    pub fn display(self) -> &'static str {
        match self {
            Self::VerifyUser => "Verify User",
            Self::Authorship => "Authorship",
            Self::License => "License",
            Self::Policy => "Policy",
            Self::Classification => "Category",
            Self::CrossList => "Cross-list",
            Self::FileUpload => "Upload Files",
            Self::Process => "Process Files",
            Self::Metadata => "Metadata",
            Self::OptionalMetadata => "Opt. Metadata",
            Self::FinalPreview => "Preview",
            Self::Confirm => "Confirmed",
        }
    }

    /// The completion check a stage of this kind uses unless overridden.
    pub fn default_check(self) -> CompletionCheck {
        match self {
            Self::VerifyUser => conditions::is_contact_verified,
            Self::Authorship => conditions::is_authorship_indicated,
            Self::License => conditions::has_license,
            Self::Policy => conditions::is_policy_accepted,
            Self::Classification => conditions::has_primary,
            Self::CrossList => conditions::has_secondary,
            Self::FileUpload => conditions::has_valid_content,
            Self::Process => conditions::is_source_processed,
            Self::Metadata => conditions::is_metadata_complete,
            Self::OptionalMetadata => conditions::is_opt_metadata_complete,
            Self::FinalPreview => conditions::is_finalized,
            Self::Confirm => conditions::is_finalized,
        }
    }

    /// Finds the kind whose endpoint matches.
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.endpoint() == endpoint)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured step of a workflow.
///
/// Stages are built once when a workflow is defined and are read-only
/// afterwards. The same kind may be configured differently in different
/// workflows.
#[derive(Debug, Clone)]
pub struct Stage {
    /// What this stage is
    pub kind: StageKind,

    /// Must be complete before the stage counts as done
    pub required: bool,

    /// Must be visited at least once before the stage counts as done
    pub must_see: bool,

    check: CompletionCheck,
}

impl Stage {
    /// Creates a required, not must-see stage using the kind's default check.
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            required: true,
            must_see: false,
            check: kind.default_check(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_must_see(mut self, must_see: bool) -> Self {
        self.must_see = must_see;
        self
    }

    /// Replaces the completion check.
    pub fn with_check(mut self, check: CompletionCheck) -> Self {
        self.check = check;
        self
    }

    /// Evaluates the completion check against a snapshot.
    pub fn is_complete(&self, submission: &Submission) -> bool {
        (self.check)(submission)
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub fn endpoint(&self) -> &'static str {
        self.kind.endpoint()
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn display(&self) -> &'static str {
        self.kind.display()
    }
}

// Completion checks are not compared: two stages configured alike are equal.
impl PartialEq for Stage {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.required == other.required && self.must_see == other.must_see
    }
}

impl Eq for Stage {}
