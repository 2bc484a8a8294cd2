//! Runtime Configuration
//!
//! Settings for the request flow layer. Defaults are resolved once from the
//! environment:
//!
//! - `SUBMITFLOW_EXIT_ENDPOINT`: endpoint used when leaving the workflow
//!   (default `create_submission`)
//! - `SUBMITFLOW_SEEN_DIR`: directory holding seen records
//!   (default `$HOME/.submitflow/seen`)

use std::env;
use std::path::PathBuf;

use log::info;
use once_cell::sync::Lazy;

/// Endpoint users are sent to on "save and exit".
pub const DEFAULT_EXIT_ENDPOINT: &str = "create_submission";

/// Lazily-resolved exit endpoint.
pub static EXIT_ENDPOINT: Lazy<String> = Lazy::new(|| {
    env::var("SUBMITFLOW_EXIT_ENDPOINT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EXIT_ENDPOINT.to_string())
});

/// Lazily-resolved directory for seen records.
pub static SEEN_DIR: Lazy<PathBuf> = Lazy::new(|| {
    // Priority 1: explicit override
    if let Ok(dir) = env::var("SUBMITFLOW_SEEN_DIR") {
        if !dir.trim().is_empty() {
            info!("Using seen directory from SUBMITFLOW_SEEN_DIR: {}", dir);
            return PathBuf::from(dir);
        }
    }

    // Priority 2: per-user directory
    if let Ok(home) = env::var("HOME").or_else(|_| env::var("USERPROFILE")) {
        return PathBuf::from(home).join(".submitflow").join("seen");
    }

    // Priority 3: current working directory
    PathBuf::from(".submitflow").join("seen")
});

/// Settings for [`FlowController`](crate::flow::FlowController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Endpoint for "save and exit" and for moving past either end of a workflow
    pub exit_endpoint: String,

    /// Where seen records are stored
    pub seen_dir: PathBuf,

    /// Attach "Please ... before proceeding." when a blocked user is redirected
    pub notify_blocked: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            exit_endpoint: EXIT_ENDPOINT.clone(),
            seen_dir: SEEN_DIR.clone(),
            notify_blocked: true,
        }
    }
}

impl FlowConfig {
    pub fn with_exit_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.exit_endpoint = endpoint.into();
        self
    }

    pub fn with_seen_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.seen_dir = dir.into();
        self
    }

    pub fn with_notify_blocked(mut self, notify: bool) -> Self {
        self.notify_blocked = notify;
        self
    }
}
