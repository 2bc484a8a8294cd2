//! Submission Snapshot Module
//!
//! The read-only submission state the workflow engine evaluates.
//!
//! - [`model`]: Snapshot data structures
//! - [`loader`]: JSON loading

pub mod loader;
pub mod model;

pub use loader::{load_submission, parse_submission};
pub use model::{Classification, License, Metadata, SourceContent, SourceFormat, Submission};
