//! Workflow Definition Module
//!
//! Stages, workflow definitions, and the processor that decides where a
//! submission currently stands.
//!
//! # Structure
//!
//! - [`conditions`]: Completion predicates over a submission
//! - [`stage`]: Stage kinds and configured stages
//! - [`definition`]: Ordered workflows and stage lookup
//! - [`builtin`]: New-submission and replacement workflows, workflow selection
//! - [`parser`]: YAML loading of custom workflows
//! - [`processor`]: Per-request evaluation of a submission
//! - [`seen`]: Visited-stage tracking and persistence

pub mod builtin;
pub mod conditions;
pub mod definition;
pub mod parser;
pub mod processor;
pub mod seen;
pub mod stage;

pub use builtin::{select_workflow, REPLACEMENT_WORKFLOW, SUBMISSION_WORKFLOW};
pub use conditions::CompletionCheck;
pub use definition::{StageQuery, WorkflowDefinition};
pub use parser::{load_workflow_definition, parse_workflow_definition};
pub use processor::WorkflowProcessor;
pub use seen::{SeenRecord, SeenSteps};
pub use stage::{Stage, StageKind};
