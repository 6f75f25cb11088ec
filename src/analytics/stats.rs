//! Basic statistics over the whole user collection.
//!
//! Every record counts towards the total and the average name length (a missing
//! name counts as zero characters). Only emails containing `@` feed the domain
//! histogram.

use super::{DomainHistogram, round2};
use crate::model::UserRecord;
use crate::progress::ProgressTracker;
use serde::{Serialize, Serializer};
use serde_json::json;

/// Datasets at or below this size skip per-record progress.
pub const PER_RECORD_PROGRESS_THRESHOLD: usize = 10;

/// Aggregate metrics for the `data://users/stats` resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub total: usize,
    pub domains: DomainHistogram,
    pub most_common_domain: Option<String>,
    pub domain_count: usize,
    pub average_name_length: f64,
}

/// Statistics, or the empty placeholder returned when storage does not exist.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    NoData,
    Stats(BasicStats),
}

impl StatsOutcome {
    pub fn stats(&self) -> Option<&BasicStats> {
        match self {
            Self::Stats(stats) => Some(stats),
            Self::NoData => None,
        }
    }

    /// Total users covered; zero for [`StatsOutcome::NoData`].
    pub fn total(&self) -> usize {
        self.stats().map_or(0, |s| s.total)
    }
}

impl Serialize for StatsOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoData => json!({"total": 0, "domains": {}}).serialize(serializer),
            Self::Stats(stats) => stats.serialize(serializer),
        }
    }
}

/// Mean name length in characters across all records, rounded to 2 decimals.
pub fn average_name_length(records: &[UserRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: usize = records.iter().map(UserRecord::name_len).sum();
    round2(sum as f64 / records.len() as f64)
}

/// Compute [`BasicStats`], reporting progress on a percentage tracker.
///
/// Loading (0-30%) is the caller's stage. This function reports accumulation
/// (30-60%), derived values (60-90%) and finalization (90-100%). Stage
/// boundaries are always emitted.
pub fn compute_basic_stats(records: &[UserRecord], tracker: &mut ProgressTracker<'_>) -> BasicStats {
    let sink = tracker.sink();
    let total = records.len();

    sink.info("Calculating basic statistics...");
    let mut domains = DomainHistogram::new();
    for (i, record) in records.iter().enumerate() {
        domains.record_email(record);
        if total > PER_RECORD_PROGRESS_THRESHOLD {
            tracker.advance_within(30, 30, i, total);
        }
    }
    tracker.advance_to(60);

    sink.info("Calculating advanced statistics...");
    let most_common_domain = domains.most_common().map(|(d, _)| d.to_string());
    let average_name_length = average_name_length(records);
    tracker.advance_to(90);

    sink.info("Finalizing statistics...");
    tracker.advance_to(100);
    sink.info(&format!("Generated statistics for {} users", total));

    BasicStats {
        total,
        domain_count: domains.len(),
        domains,
        most_common_domain,
        average_name_length,
    }
}
