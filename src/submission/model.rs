//! Submission Snapshot Model
//!
//! Read-only view of a submission as loaded by the request layer. The
//! workflow engine never mutates it; stage completion checks read it.
//!
//! Every field has a serde default so partial snapshots (a submission that
//! is still being created) deserialize cleanly and simply evaluate as
//! "not complete".
//!
//! # Example JSON Format
//!
//! ```json
//! {
//!   "submission_id": 1234,
//!   "version": 1,
//!   "submitter_contact_verified": true,
//!   "submitter_is_author": true,
//!   "license": { "uri": "http://creativecommons.org/licenses/by/4.0/" },
//!   "primary_classification": { "category": "astro-ph.GA" },
//!   "source_content": {
//!     "checksum": "a1b2c3",
//!     "source_format": "tex",
//!     "uncompressed_size": 58213
//!   },
//!   "metadata": { "title": "On stars", "abstract": "...", "authors_display": "A. Author" }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A snapshot of one submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Submission {
    /// Identifier assigned by the submission service
    #[serde(deserialize_with = "null_as_default")]
    pub submission_id: u64,

    /// 1 for a new submission, greater than 1 for a replacement
    #[serde(deserialize_with = "null_as_default")]
    pub version: u32,

    /// Whether the submitter has finalized the submission
    #[serde(deserialize_with = "null_as_default")]
    pub is_finalized: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub submitter_contact_verified: bool,

    /// `Some` once the submitter has answered the authorship question,
    /// whichever way they answered
    pub submitter_is_author: Option<bool>,

    #[serde(deserialize_with = "null_as_default")]
    pub submitter_accepts_policy: bool,

    pub license: Option<License>,

    pub primary_classification: Option<Classification>,

    #[serde(deserialize_with = "null_as_default")]
    pub secondary_classification: Vec<Classification>,

    /// Uploaded source package, if any
    pub source_content: Option<SourceContent>,

    /// Whether the uploaded source has been compiled successfully
    #[serde(deserialize_with = "null_as_default")]
    pub is_source_processed: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            submission_id: 0,
            version: 1,
            is_finalized: false,
            submitter_contact_verified: false,
            submitter_is_author: None,
            submitter_accepts_policy: false,
            license: None,
            primary_classification: None,
            secondary_classification: Vec::new(),
            source_content: None,
            is_source_processed: false,
            metadata: Metadata::default(),
        }
    }
}

impl Submission {
    /// Creates an empty snapshot for a newly created submission.
    pub fn new(submission_id: u64) -> Self {
        Self {
            submission_id,
            ..Self::default()
        }
    }

    /// Returns true if this snapshot is a replacement of an earlier version.
    pub fn is_replacement(&self) -> bool {
        self.version > 1
    }
}

/// License selected by the submitter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A subject classification (primary or cross-list).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
}

impl Classification {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

/// Format detected for an uploaded source package.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Unknown,
    Invalid,
    Tex,
    Pdftex,
    Postscript,
    Html,
    Pdf,
    Docx,
    Odf,
}

/// Summary of the uploaded source package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SourceContent {
    pub checksum: Option<String>,
    pub source_format: Option<SourceFormat>,
    #[serde(deserialize_with = "null_as_default")]
    pub uncompressed_size: u64,
}

/// Descriptive metadata. Title, abstract and authors are required;
/// the rest are optional extras.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Metadata {
    pub title: Option<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub comments: Option<String>,
    pub authors_display: Option<String>,
    pub doi: Option<String>,
    pub msc_class: Option<String>,
    pub acm_class: Option<String>,
    pub report_num: Option<String>,
    pub journal_ref: Option<String>,
}
