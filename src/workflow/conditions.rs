//! Stage Completion Conditions
//!
//! Pure predicates over a submission snapshot. Missing data always
//! evaluates to `false`; a half-filled submission is a normal state.

use crate::submission::{SourceFormat, Submission};

/// Signature shared by every completion check.
pub type CompletionCheck = fn(&Submission) -> bool;

/// The submitter has verified their contact information.
pub fn is_contact_verified(submission: &Submission) -> bool {
    submission.submitter_contact_verified
}

/// The submitter has answered the authorship question (either way).
pub fn is_authorship_indicated(submission: &Submission) -> bool {
    submission.submitter_is_author.is_some()
}

pub fn has_license(submission: &Submission) -> bool {
    submission.license.is_some()
}

pub fn is_policy_accepted(submission: &Submission) -> bool {
    submission.submitter_accepts_policy
}

pub fn has_primary(submission: &Submission) -> bool {
    submission.primary_classification.is_some()
}

pub fn has_secondary(submission: &Submission) -> bool {
    !submission.secondary_classification.is_empty()
}

/// Uploaded content is present, checksummed, non-empty, and in a usable format.
pub fn has_valid_content(submission: &Submission) -> bool {
    match &submission.source_content {
        Some(content) => {
            content.checksum.is_some()
                && content.uncompressed_size > 0
                && matches!(content.source_format, Some(format) if format != SourceFormat::Invalid)
        }
        None => false,
    }
}

/// Uploaded content is in a format that does not need compilation.
pub fn has_non_processing_content(submission: &Submission) -> bool {
    submission
        .source_content
        .as_ref()
        .and_then(|content| content.source_format)
        .map(|format| format != SourceFormat::Tex && format != SourceFormat::Postscript)
        .unwrap_or(false)
}

/// The upload has been compiled, or never needed compiling.
pub fn is_source_processed(submission: &Submission) -> bool {
    has_valid_content(submission)
        && (submission.is_source_processed || has_non_processing_content(submission))
}

/// Title, abstract and authors are all present.
pub fn is_metadata_complete(submission: &Submission) -> bool {
    let metadata = &submission.metadata;
    metadata.title.is_some() && metadata.abstract_text.is_some() && metadata.authors_display.is_some()
}

/// At least one optional metadata field has been set.
pub fn is_opt_metadata_complete(submission: &Submission) -> bool {
    let metadata = &submission.metadata;
    metadata.doi.is_some()
        || metadata.msc_class.is_some()
        || metadata.acm_class.is_some()
        || metadata.report_num.is_some()
        || metadata.journal_ref.is_some()
}

pub fn is_finalized(submission: &Submission) -> bool {
    submission.is_finalized
}
