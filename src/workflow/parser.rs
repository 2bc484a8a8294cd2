//! Workflow Definition Parser
//!
//! Loads custom workflow definitions from YAML. Stages are referenced by
//! endpoint, either bare or with flags.
//!
//! # Example YAML Format
//!
//! ```yaml
//! name: ShortWorkflow
//! stages:
//!   - verify_user
//!   - policy
//!   - endpoint: cross_list
//!     required: false
//!     must_see: true
//!   - final_preview
//! ```
//!
//! `confirmation` defaults to the `confirmation` stage, which is appended
//! (optional, not must-see) when the stage list does not mention it.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use super::definition::WorkflowDefinition;
use super::stage::{Stage, StageKind};
use crate::error::{FlowError, Result};

#[derive(Deserialize, Debug)]
struct WorkflowFile {
    name: String,

    #[serde(default = "default_confirmation")]
    confirmation: String,

    stages: Vec<StageEntry>,
}

/// Accepts either `- policy` or `- endpoint: policy` with flags.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum StageEntry {
    Endpoint(String),
    Configured {
        endpoint: String,
        #[serde(default = "default_required")]
        required: bool,
        #[serde(default)]
        must_see: bool,
    },
}

fn default_confirmation() -> String {
    StageKind::Confirm.endpoint().to_string()
}

fn default_required() -> bool {
    true
}

fn kind_for(endpoint: &str) -> Result<StageKind> {
    StageKind::from_endpoint(endpoint.trim())
        .ok_or_else(|| FlowError::UnknownStage(endpoint.to_string()))
}

impl StageEntry {
    fn into_stage(self) -> Result<Stage> {
        match self {
            StageEntry::Endpoint(endpoint) => Ok(Stage::new(kind_for(&endpoint)?)),
            StageEntry::Configured {
                endpoint,
                required,
                must_see,
            } => Ok(Stage::new(kind_for(&endpoint)?)
                .with_required(required)
                .with_must_see(must_see)),
        }
    }
}

/// Parses a workflow definition from a YAML string.
pub fn parse_workflow_definition(yaml: &str) -> Result<WorkflowDefinition> {
    let file: WorkflowFile = serde_yaml::from_str(yaml)?;
    let confirmation = kind_for(&file.confirmation)?;

    let mut order = file
        .stages
        .into_iter()
        .map(StageEntry::into_stage)
        .collect::<Result<Vec<_>>>()?;

    if !order.is_empty() && !order.iter().any(|stage| stage.kind == confirmation) {
        debug!(
            "Workflow '{}': appending confirmation stage '{}'",
            file.name,
            confirmation.endpoint()
        );
        order.push(Stage::new(confirmation).with_required(false));
    }

    WorkflowDefinition::new(file.name, order, confirmation)
}

/// Loads a workflow definition from a YAML file.
pub fn load_workflow_definition(path: impl AsRef<Path>) -> Result<WorkflowDefinition> {
    let path = path.as_ref();
    info!("Loading workflow definition: {}", path.display());

    let content = fs::read_to_string(path)?;
    parse_workflow_definition(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_bare_and_configured_entries() {
        let yaml = r#"
name: ShortWorkflow
stages:
  - verify_user
  - endpoint: cross_list
    required: false
    must_see: true
  - final_preview
"#;
        let wf = parse_workflow_definition(yaml).unwrap();
        assert_eq!(wf.name(), "ShortWorkflow");
        assert_eq!(wf.len(), 4);

        let cross = wf.get(StageKind::CrossList).unwrap();
        assert!(!cross.required);
        assert!(cross.must_see);

        let verify = wf.get(StageKind::VerifyUser).unwrap();
        assert!(verify.required);
        assert!(!verify.must_see);
    }

    #[test]
    fn test_confirmation_appended_when_missing() {
        let yaml = "name: W\nstages:\n  - policy\n";
        let wf = parse_workflow_definition(yaml).unwrap();
        assert_eq!(wf.confirmation().kind, StageKind::Confirm);
        assert!(!wf.confirmation().required);
        assert_eq!(wf.order().last().unwrap().kind, StageKind::Confirm);
    }

    #[test]
    fn test_explicit_confirmation_kept() {
        let yaml = r#"
name: W
confirmation: final_preview
stages:
  - policy
  - final_preview
"#;
        let wf = parse_workflow_definition(yaml).unwrap();
        assert_eq!(wf.len(), 2);
        assert_eq!(wf.confirmation().kind, StageKind::FinalPreview);
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let yaml = "name: W\nstages:\n  - not_a_stage\n";
        let result = parse_workflow_definition(yaml);
        assert!(matches!(result, Err(FlowError::UnknownStage(ref e)) if e == "not_a_stage"));
    }

    #[test]
    fn test_empty_stage_list_rejected() {
        let yaml = "name: W\nstages: []\n";
        assert!(matches!(
            parse_workflow_definition(yaml),
            Err(FlowError::EmptyWorkflow(_))
        ));
    }

    #[test]
    fn test_duplicate_endpoint_rejected() {
        let yaml = "name: W\nstages:\n  - policy\n  - policy\n";
        assert!(matches!(
            parse_workflow_definition(yaml),
            Err(FlowError::DuplicateStage { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_workflow_definition("name: [unclosed");
        assert!(matches!(result, Err(FlowError::Yaml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("workflow.yaml");
        fs::write(&path, "name: FromFile\nstages:\n  - license\n  - policy\n").unwrap();

        let wf = load_workflow_definition(&path).unwrap();
        assert_eq!(wf.name(), "FromFile");
        assert_eq!(wf.len(), 3);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_workflow_definition("/nonexistent/workflow.yaml");
        assert!(matches!(result, Err(FlowError::Io(_))));
    }
}
