//! Bulk insertion of user candidates.
//!
//! Candidates are validated one by one; a rejected candidate is counted and
//! described in the error list but never aborts the batch. Accepted candidates are
//! appended, in input order, to the collection loaded at the start of the call.
//! Persisting the combined collection is the caller's job and happens once.

use crate::model::{RecordCollection, UserCandidate};
use crate::progress::ProgressTracker;
use serde::Serialize;

/// Outcome kind of a bulk call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkStatus {
    /// Nothing was submitted; storage was not touched.
    Success,
    /// The batch was processed and persisted.
    Completed,
}

/// Per-call success/failure breakdown.
///
/// `successful + failed == total_processed` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub status: BulkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl BulkResult {
    /// Result for an empty batch.
    pub fn nothing_to_add() -> Self {
        Self {
            status: BulkStatus::Success,
            message: Some("No users to add".to_string()),
            total_processed: 0,
            successful: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }
}

/// Validate `candidates` and append the accepted ones to `collection`.
///
/// Reports progress once per candidate (`i + 1` of `candidates.len()`) on a
/// tracker whose total is the batch size.
pub fn apply_candidates(
    collection: &mut RecordCollection,
    candidates: &[UserCandidate],
    tracker: &mut ProgressTracker<'_>,
) -> BulkResult {
    let sink = tracker.sink();
    let mut accepted = Vec::with_capacity(candidates.len());
    let mut errors = Vec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        match candidate.validate() {
            Ok(record) => {
                sink.info(&format!("Queued user: {}", record.name_or_empty()));
                accepted.push(record);
            }
            Err(e) => {
                let message = format!("Failed to add user {}: {}", candidate.describe(i + 1), e);
                sink.warning(&message);
                errors.push(message);
            }
        }
        tracker.advance_to(i as u64 + 1);
    }

    let successful = accepted.len();
    collection.extend(accepted);

    BulkResult {
        status: BulkStatus::Completed,
        message: None,
        total_processed: candidates.len(),
        successful,
        failed: errors.len(),
        errors,
    }
}
