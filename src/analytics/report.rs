//! Data quality report.
//!
//! The report runs four stages on a percentage tracker: validation (to 20%),
//! domain analysis (to 50%), name analysis (to 80%) and compilation (to 100%).
//! Invalid records count towards the summary totals but are excluded from the
//! domain and name analyses.

use super::{DomainHistogram, round2};
use crate::model::UserRecord;
use crate::progress::ProgressTracker;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Domain analysis emits per-record progress above this many valid records.
pub const DOMAIN_PROGRESS_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "total_users")]
    pub total: usize,
    #[serde(rename = "valid_users")]
    pub valid_count: usize,
    #[serde(rename = "invalid_users")]
    pub invalid_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameAnalysis {
    pub total_names: usize,
    pub unique_names: usize,
    #[serde(rename = "avg_name_length")]
    pub avg_length: f64,
    /// Empty when there are no valid records.
    #[serde(rename = "longest_name")]
    pub longest: String,
    #[serde(rename = "shortest_name")]
    pub shortest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub validity_percentage: f64,
    pub issues_found: usize,
}

/// Structured report returned by the `data://users/report` resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub domain_analysis: DomainHistogram,
    pub name_analysis: NameAnalysis,
    pub data_quality: DataQuality,
}

/// Either a report or the "no data" sentinel for storage that does not exist.
///
/// An existing but empty store yields a populated report with zero counts; only
/// absent storage produces [`ReportOutcome::NoData`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    NoData,
    Report(AnalysisReport),
}

impl ReportOutcome {
    pub const NO_DATA_MESSAGE: &'static str = "No data available";

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl Serialize for ReportOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoData => serializer.serialize_str(Self::NO_DATA_MESSAGE),
            Self::Report(report) => report.serialize(serializer),
        }
    }
}

/// Split records into valid and invalid, preserving order.
pub fn partition_valid(records: &[UserRecord]) -> (Vec<&UserRecord>, Vec<&UserRecord>) {
    records.iter().partition(|record| record.is_valid())
}

/// Name statistics over valid records.
///
/// Longest and shortest are measured in characters; ties keep the first record
/// in collection order.
pub fn analyze_names(valid: &[&UserRecord]) -> NameAnalysis {
    let names: Vec<&str> = valid.iter().map(|r| r.name_or_empty()).collect();
    let unique_names = names.iter().collect::<HashSet<_>>().len();

    let mut longest: Option<(&str, usize)> = None;
    let mut shortest: Option<(&str, usize)> = None;
    let mut total_len = 0usize;
    for name in &names {
        let len = name.chars().count();
        total_len += len;
        if longest.is_none_or(|(_, l)| len > l) {
            longest = Some((*name, len));
        }
        if shortest.is_none_or(|(_, l)| len < l) {
            shortest = Some((*name, len));
        }
    }

    let avg_length = if names.is_empty() {
        0.0
    } else {
        round2(total_len as f64 / names.len() as f64)
    };

    NameAnalysis {
        total_names: names.len(),
        unique_names,
        avg_length,
        longest: longest.map(|(n, _)| n.to_string()).unwrap_or_default(),
        shortest: shortest.map(|(n, _)| n.to_string()).unwrap_or_default(),
    }
}

/// Percentage of valid records, rounded to 2 decimals; zero for an empty set.
pub fn validity_percentage(valid_count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(valid_count as f64 / total as f64 * 100.0)
}

/// Build the report, emitting progress at 20, 50, 80 and 100 percent.
///
/// The caller reports 0% before loading the collection.
pub fn generate_report(records: &[UserRecord], tracker: &mut ProgressTracker<'_>) -> AnalysisReport {
    let sink = tracker.sink();

    let (valid, invalid) = partition_valid(records);
    tracker.advance_to(20);

    sink.info("Analyzing email domains...");
    let mut domain_analysis = DomainHistogram::new();
    for (i, record) in valid.iter().enumerate() {
        domain_analysis.record_email(record);
        if valid.len() > DOMAIN_PROGRESS_THRESHOLD {
            tracker.advance_within(20, 30, i, valid.len());
        }
    }
    tracker.advance_to(50);

    sink.info("Analyzing user names...");
    let name_analysis = analyze_names(&valid);
    tracker.advance_to(80);

    sink.info("Compiling final report...");
    let report = AnalysisReport {
        summary: ReportSummary {
            total: records.len(),
            valid_count: valid.len(),
            invalid_count: invalid.len(),
        },
        domain_analysis,
        name_analysis,
        data_quality: DataQuality {
            validity_percentage: validity_percentage(valid.len(), records.len()),
            issues_found: invalid.len(),
        },
    };
    tracker.advance_to(100);
    sink.info("User report generation completed successfully");

    report
}
