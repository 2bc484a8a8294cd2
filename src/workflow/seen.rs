//! Seen-Stage Tracking
//!
//! Records which stages a user has visited. The engine reads and updates a
//! [`SeenSteps`] map handed in by the caller; [`SeenRecord`] is a file-backed
//! store for that map, one record per submission so two submissions worked
//! on in the same session do not share state.
//!
//! Records are saved to `{seen_dir}/{submission_id}.seen.json`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};

/// Visited stages, keyed by stage endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SeenSteps(HashMap<String, bool>);

impl SeenSteps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent endpoints count as not seen.
    pub fn is_seen(&self, endpoint: &str) -> bool {
        self.0.get(endpoint).copied().unwrap_or(false)
    }

    pub fn mark(&mut self, endpoint: &str) {
        self.0.insert(endpoint.to_string(), true);
    }

    /// Number of endpoints marked as seen.
    pub fn len(&self) -> usize {
        self.0.values().filter(|seen| **seen).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<HashMap<String, bool>> for SeenSteps {
    fn from(map: HashMap<String, bool>) -> Self {
        Self(map)
    }
}

impl From<SeenSteps> for HashMap<String, bool> {
    fn from(seen: SeenSteps) -> Self {
        seen.0
    }
}

/// Persistent seen-state for one submission.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SeenRecord {
    pub submission_id: u64,

    /// Name of the workflow the steps were seen in
    pub workflow: String,

    pub steps: SeenSteps,

    /// Last time the record was updated
    pub updated_at: DateTime<Utc>,
}

impl SeenRecord {
    /// Creates an empty record.
    pub fn new(submission_id: u64, workflow: impl Into<String>) -> Self {
        Self {
            submission_id,
            workflow: workflow.into(),
            steps: SeenSteps::new(),
            updated_at: Utc::now(),
        }
    }

    /// Returns the record path for a submission inside `dir`.
    pub fn path_for(dir: impl AsRef<Path>, submission_id: u64) -> PathBuf {
        dir.as_ref().join(format!("{}.seen.json", submission_id))
    }

    /// Loads the record for a submission.
    ///
    /// Returns an error if no record exists or it can't be read.
    pub fn load(dir: impl AsRef<Path>, submission_id: u64) -> Result<Self> {
        let path = Self::path_for(dir, submission_id);
        let content = fs::read_to_string(&path)?;
        let record: SeenRecord = serde_json::from_str(&content)?;

        info!("Loaded seen record from {}", path.display());
        debug!("Previously seen: {:?}", record.steps);
        Ok(record)
    }

    /// Loads the record, or starts a fresh one if there is none.
    ///
    /// A record saved for a different workflow is discarded: stage flags
    /// differ between workflows. An unreadable or corrupt record is an
    /// error, so it is never silently overwritten.
    pub fn load_or_new(dir: impl AsRef<Path>, submission_id: u64, workflow: &str) -> Result<Self> {
        match Self::load(dir, submission_id) {
            Ok(record) if record.workflow == workflow => Ok(record),
            Ok(record) => {
                info!(
                    "Discarding seen record for workflow '{}' (now '{}')",
                    record.workflow, workflow
                );
                Ok(Self::new(submission_id, workflow))
            }
            Err(FlowError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No seen record for submission {}", submission_id);
                Ok(Self::new(submission_id, workflow))
            }
            Err(e) => {
                warn!("Could not read seen record for submission {}: {}", submission_id, e);
                Err(e)
            }
        }
    }

    /// Saves the record as pretty JSON, creating `dir` if needed.
    pub fn save(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        self.updated_at = Utc::now();
        let path = Self::path_for(dir, self.submission_id);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;

        info!("Saved seen record to {}", path.display());
        Ok(())
    }

    /// Clears all seen steps (for a fresh start).
    pub fn clear(&mut self) {
        self.steps.clear();
        self.updated_at = Utc::now();
    }

    /// Deletes the record file if it exists.
    pub fn delete(&self, dir: impl AsRef<Path>) -> Result<()> {
        let path = Self::path_for(dir, self.submission_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted seen record: {}", path.display());
        }
        Ok(())
    }
}
