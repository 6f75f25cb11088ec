//! Statistics, report and analysis over stored data.

use crate::common::{fixtures, service_in, temp_service, write_users_document};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use user_data_server::analytics::insights::{EXTERNAL_INSIGHTS_HEADER, EXTERNAL_INSIGHTS_UNAVAILABLE};
use user_data_server::analytics::{InsightError, TextInsightGenerator};
use user_data_server::progress::{MessageLevel, NoopSink, RecordingSink};
use user_data_server::{
    AnalysisOutcome, InMemoryStore, ReportOutcome, StatsOutcome, UserDataService,
};

struct CannedInsights;

#[async_trait]
impl TextInsightGenerator for CannedInsights {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        assert!(prompt.contains("Total users: 2"));
        Ok("1. Expand beyond x.com".to_string())
    }
}

struct Refusing;

#[async_trait]
impl TextInsightGenerator for Refusing {
    async fn generate(&self, _prompt: &str) -> Result<String, InsightError> {
        Err(InsightError::Unavailable("client does not support sampling".to_string()))
    }
}

#[tokio::test]
async fn alice_and_bob_statistics() {
    let service = UserDataService::new(InMemoryStore::with_records(fixtures::alice_and_bob()));
    let outcome = service.basic_stats(&NoopSink).await.unwrap();
    let stats = outcome.stats().unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.domains.get("x.com"), Some(1));
    assert_eq!(stats.domains.get("y.com"), Some(1));
    assert_eq!(stats.most_common_domain.as_deref(), Some("x.com"));
    assert_eq!(stats.domain_count, 2);
}

#[tokio::test]
async fn missing_storage_yields_sentinels() {
    let (_dir, service) = temp_service().await;

    assert_eq!(service.basic_stats(&NoopSink).await.unwrap(), StatsOutcome::NoData);
    let report = service.generate_report(&NoopSink).await.unwrap();
    assert_eq!(report, ReportOutcome::NoData);
    assert_eq!(serde_json::to_value(&report).unwrap(), json!("No data available"));
}

#[tokio::test]
async fn empty_document_yields_zero_report_not_sentinel() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &json!({"users": []}));
    let service = service_in(dir.path()).await;

    let report = service.generate_report(&NoopSink).await.unwrap();
    let report = report.report().expect("populated report");
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.data_quality.validity_percentage, 0.0);
    assert_eq!(report.name_analysis.longest, "");
}

#[tokio::test]
async fn mixed_quality_report() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &fixtures::mixed_quality_document());
    let service = service_in(dir.path()).await;

    let outcome = service.generate_report(&NoopSink).await.unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "summary": {"total_users": 6, "valid_users": 3, "invalid_users": 3},
            "domain_analysis": {"company.com": 2},
            "name_analysis": {
                "total_names": 3,
                "unique_names": 3,
                "avg_name_length": 7.0,
                "longest_name": "Alice Johnson",
                "shortest_name": "Bob"
            },
            "data_quality": {"validity_percentage": 50.0, "issues_found": 3}
        })
    );
}

#[tokio::test]
async fn mixed_quality_statistics_count_every_record() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &fixtures::mixed_quality_document());
    let service = service_in(dir.path()).await;

    let outcome = service.basic_stats(&NoopSink).await.unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "total": 6,
            "domains": {"company.com": 3, "other.org": 1},
            "most_common_domain": "company.com",
            "domain_count": 2,
            "average_name_length": 4.0
        })
    );
}

#[tokio::test]
async fn report_progress_for_large_dataset() {
    let records = fixtures::users_on_domains(12, &["a.com", "b.com", "c.com"]);
    let service = UserDataService::new(InMemoryStore::with_records(records));
    let sink = RecordingSink::new();
    service.generate_report(&sink).await.unwrap();

    let values: Vec<u64> = sink.progress_values().into_iter().map(|(c, _)| c).collect();
    assert_eq!(values.first(), Some(&0));
    assert_eq!(values.last(), Some(&100));
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values.contains(&20) && values.contains(&50) && values.contains(&80));
    // one update per valid record inside the domain stage
    assert_eq!(values.iter().filter(|&&v| (20..50).contains(&v)).count(), 1 + 12);
}

#[tokio::test]
async fn analysis_uses_the_configured_generator() {
    let service = UserDataService::new(InMemoryStore::with_records(fixtures::alice_and_bob()))
        .with_insight_generator(Arc::new(CannedInsights));
    assert!(service.has_insight_generator());

    let outcome = service.analyze(&NoopSink).await.unwrap();
    let analysis = outcome.analysis().unwrap();
    assert_eq!(analysis.total_users, 2);
    let tail: Vec<&str> = analysis.insights.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(tail, vec!["1. Expand beyond x.com", EXTERNAL_INSIGHTS_HEADER]);
}

#[tokio::test]
async fn analysis_degrades_when_generator_fails() {
    let service = UserDataService::new(InMemoryStore::with_records(fixtures::alice_and_bob()))
        .with_insight_generator(Arc::new(Refusing));
    let sink = RecordingSink::new();

    let outcome = service.analyze(&sink).await.unwrap();
    let analysis = outcome.analysis().unwrap();
    assert_eq!(
        analysis.insights.last().map(String::as_str),
        Some(EXTERNAL_INSIGHTS_UNAVAILABLE)
    );
    assert_eq!(
        sink.messages(MessageLevel::Warning),
        vec!["AI insights unavailable: text generation unavailable: client does not support sampling"]
    );
    assert_eq!(sink.progress_values().last(), Some(&(100, 100)));
}

#[tokio::test]
async fn analysis_of_missing_storage() {
    let (_dir, service) = temp_service().await;
    assert_eq!(service.analyze(&NoopSink).await.unwrap(), AnalysisOutcome::NoUsers);
}
