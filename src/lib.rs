//! Submitflow - Submission Workflow Engine
//!
//! Decides, for a submission moving through a multi-step web form, which
//! step the user may be on, whether they may go to a requested step, and
//! where to send them after a step has been handled.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`submission`]: Read-only submission snapshot and JSON loading
//! - [`workflow`]: Stages, workflow definitions and the per-request processor
//! - [`flow`]: Navigation verdicts and request orchestration
//! - [`config`]: Runtime settings
//!
//! # Example
//!
//! ```rust
//! use submitflow::flow::{ControllerOutcome, FlowController, Method, StatusCode, StepResult, UserAction};
//! use submitflow::submission::Submission;
//! use submitflow::workflow::{SeenSteps, WorkflowProcessor};
//!
//! let mut submission = Submission::new(1);
//! submission.submitter_contact_verified = true;
//!
//! let mut seen = SeenSteps::new();
//! let mut processor = WorkflowProcessor::for_submission(&submission, &mut seen);
//! let flow = FlowController::default();
//!
//! let stage = processor.workflow().get("verify_user").unwrap();
//! assert_eq!(flow.before(&processor, stage).unwrap(), None);
//!
//! let result = StepResult::new(Method::Post, StatusCode::OK)
//!     .with_action(Some(UserAction::Next))
//!     .with_outcome(ControllerOutcome::Success);
//! let navigation = flow.after(&mut processor, stage, &result).unwrap();
//! assert_eq!(navigation.endpoint(), Some("authorship"));
//! assert!(seen.is_seen("verify_user"));
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod submission;
pub mod workflow;

// Re-export commonly used types
pub use config::FlowConfig;
pub use error::{FlowError, Result};
pub use flow::{decide, FlowController, Navigation, Verdict};
pub use submission::{load_submission, Submission};
pub use workflow::{select_workflow, Stage, StageKind, WorkflowDefinition, WorkflowProcessor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Submitflow";
