//! Error Types
//!
//! Configuration errors surface while building a workflow definition and
//! should abort startup. Foreign-stage errors indicate a caller mixing stages
//! from two different workflows. Lookup misses are not errors; they are
//! reported as `None`.

use thiserror::Error;

/// Result type alias for submitflow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Main error type for all submitflow operations
#[derive(Debug, Error)]
pub enum FlowError {
    /// A workflow was defined without any stages
    #[error("Workflow '{0}' has no stages")]
    EmptyWorkflow(String),

    /// The confirmation stage is not part of the workflow order
    #[error("Workflow '{workflow}': confirmation stage '{endpoint}' is not in the stage order")]
    ConfirmationNotInOrder { workflow: String, endpoint: String },

    /// The same stage kind appears twice in one workflow
    #[error("Workflow '{workflow}': stage '{endpoint}' appears more than once")]
    DuplicateStage { workflow: String, endpoint: String },

    /// A stage from another workflow was used for ordering queries
    #[error("Stage '{endpoint}' does not belong to workflow '{workflow}'")]
    ForeignStage { workflow: String, endpoint: String },

    /// A workflow file referenced an endpoint with no matching stage kind
    #[error("Unknown stage endpoint: '{0}'")]
    UnknownStage(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON in a submission snapshot or seen record
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML in a workflow definition file
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
