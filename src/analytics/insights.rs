//! Insight generation for the `analyze_users` operation.
//!
//! Rule based insights are always produced. When a [`TextInsightGenerator`] is
//! configured it is asked for additional strategic insights; when none is
//! configured, or it fails, the analysis degrades to the rule based insights plus
//! a note, and the call still succeeds.

use super::DomainHistogram;
use crate::model::{UserRecord, email_domain};
use crate::progress::ProgressTracker;
use async_trait::async_trait;
use log::debug;
use serde::{Serialize, Serializer};
use serde_json::json;

/// Line placed in front of externally generated insights.
pub const EXTERNAL_INSIGHTS_HEADER: &str = "AI-Powered Strategic Insights:";
/// Line used when no external insights could be produced.
pub const EXTERNAL_INSIGHTS_UNAVAILABLE: &str = "AI insights not available in this environment";

/// Errors reported by a text insight generator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InsightError {
    /// The capability exists but cannot be used right now (e.g. client lacks sampling)
    #[error("text generation unavailable: {0}")]
    Unavailable(String),

    /// The generator was reached but produced no usable answer
    #[error("text generation failed: {0}")]
    Failed(String),
}

/// Optional external capability producing free text from a prompt.
///
/// Typically backed by an LLM sampling request to the MCP client.
#[async_trait]
pub trait TextInsightGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Result of analyzing a non-empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAnalysis {
    pub total_users: usize,
    pub email_domains: DomainHistogram,
    pub insights: Vec<String>,
}

/// Analysis result, or the marker for an empty collection.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    NoUsers,
    Analysis(UserAnalysis),
}

impl AnalysisOutcome {
    pub const NO_USERS_MESSAGE: &'static str = "No users to analyze";

    pub fn analysis(&self) -> Option<&UserAnalysis> {
        match self {
            Self::Analysis(analysis) => Some(analysis),
            Self::NoUsers => None,
        }
    }
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoUsers => json!({"analysis": Self::NO_USERS_MESSAGE}).serialize(serializer),
            Self::Analysis(analysis) => analysis.serialize(serializer),
        }
    }
}

/// Insights derived from the domain histogram, the names and the email format.
pub fn rule_insights(records: &[UserRecord], domains: &DomainHistogram) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some((top, count)) = domains.most_common() {
        let domain_count = domains.len();
        insights.push(format!("Found {} unique email domains", domain_count));
        insights.push(format!("Most common domain: {} ({} users)", top, count));
        if domain_count > 3 {
            insights.push("Good diversity in email domains".to_string());
        } else if domain_count == 1 {
            insights.push("All users from single domain - consider expanding reach".to_string());
        }
    }

    let name_lengths: Vec<usize> = records
        .iter()
        .filter(|r| !r.name_or_empty().is_empty())
        .map(UserRecord::name_len)
        .collect();
    if !name_lengths.is_empty() {
        let avg = name_lengths.iter().sum::<usize>() as f64 / name_lengths.len() as f64;
        insights.push(format!("Average name length: {:.1} characters", avg));
        if avg > 15.0 {
            insights.push("Users tend to have longer names".to_string());
        } else if avg < 8.0 {
            insights.push("Users tend to have shorter names".to_string());
        }
    }

    let well_formed = records
        .iter()
        .filter(|r| email_domain(r.email_or_empty()).is_some())
        .count();
    if well_formed < records.len() {
        insights.push(format!(
            "Data quality issue: {} users with invalid emails",
            records.len() - well_formed
        ));
    } else {
        insights.push("All users have valid email format".to_string());
    }

    insights
}

/// Prompt handed to the external generator.
pub fn insight_prompt(total_users: usize, domains: &DomainHistogram, basic: &[String]) -> String {
    format!(
        "Analyze this user data and provide strategic insights:\n\
         \n\
         Data Summary:\n\
         - Total users: {total_users}\n\
         - Email domains: {domains}\n\
         - Basic insights: {basic:?}\n\
         \n\
         Please provide 3-5 strategic insights about:\n\
         1. User acquisition patterns\n\
         2. Market reach and diversity\n\
         3. Potential growth opportunities\n\
         4. Data quality recommendations\n\
         \n\
         Keep insights concise and actionable."
    )
}

/// Run the staged analysis over a non-empty collection.
///
/// The caller reports 0% and, after loading, 20%. This function covers domain
/// counting (20-60%), rule insights (to 75%), external insights (to 90%) and
/// finalization (to 100%).
pub async fn analyze_users(
    records: &[UserRecord],
    generator: Option<&dyn TextInsightGenerator>,
    tracker: &mut ProgressTracker<'_>,
) -> UserAnalysis {
    let sink = tracker.sink();

    sink.info("Analyzing email domains...");
    let mut domains = DomainHistogram::new();
    for (i, record) in records.iter().enumerate() {
        domains.record_email(record);
        tracker.advance_within(20, 40, i, records.len());
    }
    tracker.advance_to(60);

    sink.info("Generating insights...");
    let mut insights = rule_insights(records, &domains);
    tracker.advance_to(75);

    sink.info("Generating AI-powered insights...");
    let external = match generator {
        Some(generator) => {
            let prompt = insight_prompt(records.len(), &domains, &insights);
            generator.generate(&prompt).await
        }
        None => Err(InsightError::Unavailable(
            "no text generator configured".to_string(),
        )),
    };
    match external {
        Ok(text) => {
            debug!("External insights received ({} chars)", text.len());
            insights.push(EXTERNAL_INSIGHTS_HEADER.to_string());
            insights.push(text);
        }
        Err(e) => {
            sink.warning(&format!("AI insights unavailable: {}", e));
            insights.push(EXTERNAL_INSIGHTS_UNAVAILABLE.to_string());
        }
    }
    tracker.advance_to(90);

    sink.info("Finalizing analysis...");
    tracker.advance_to(100);
    sink.info("User analysis completed successfully");

    UserAnalysis {
        total_users: records.len(),
        email_domains: domains,
        insights,
    }
}
