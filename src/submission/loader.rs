//! Submission Loader
//!
//! Reads submission snapshots exported by the submission service as JSON.

use std::fs;
use std::path::Path;

use log::{debug, info};

use super::model::Submission;
use crate::error::Result;

/// Parses a submission snapshot from a JSON string.
pub fn parse_submission(json: &str) -> Result<Submission> {
    let submission: Submission = serde_json::from_str(json)?;
    debug!(
        "Parsed submission {} (version {})",
        submission.submission_id, submission.version
    );
    Ok(submission)
}

/// Loads a submission snapshot from a JSON file.
pub fn load_submission(path: impl AsRef<Path>) -> Result<Submission> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let submission = parse_submission(&content)?;

    info!(
        "Loaded submission {} from {}",
        submission.submission_id,
        path.display()
    );
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use tempfile::tempdir;

    #[test]
    fn test_load_submission_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("submission.json");
        fs::write(
            &path,
            r#"{"submission_id": 7, "submitter_contact_verified": true}"#,
        )
        .unwrap();

        let submission = load_submission(&path).unwrap();
        assert_eq!(submission.submission_id, 7);
        assert!(submission.submitter_contact_verified);
    }

    #[test]
    fn test_load_submission_missing_file() {
        let result = load_submission("/nonexistent/submission.json");
        assert!(matches!(result, Err(FlowError::Io(_))));
    }

    #[test]
    fn test_parse_submission_invalid_json() {
        let result = parse_submission("{ not json");
        assert!(matches!(result, Err(FlowError::Json(_))));
    }
}
