//! Analytics over the user collection.
//!
//! - [`stats`] - basic statistics (domain histogram, average name length)
//! - [`report`] - validation and data quality report
//! - [`insights`] - textual insights, optionally enriched by an external text generator
//!
//! The engines are synchronous and operate on borrowed records; the only thing
//! they do besides computing is push events through a
//! [`crate::progress::ProgressTracker`].

pub mod domain;
pub mod insights;
pub mod report;
pub mod stats;

pub use domain::DomainHistogram;
pub use insights::{AnalysisOutcome, InsightError, TextInsightGenerator, UserAnalysis};
pub use report::{AnalysisReport, DataQuality, NameAnalysis, ReportOutcome, ReportSummary};
pub use stats::{BasicStats, StatsOutcome};

/// Round to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
