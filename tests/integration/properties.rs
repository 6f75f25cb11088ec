//! Property based invariants of the analytics and bulk engines.

use proptest::prelude::*;
use serde_json::{Value, json};
use user_data_server::analytics::report::generate_report;
use user_data_server::analytics::stats::compute_basic_stats;
use user_data_server::progress::{NoopSink, ProgressTracker, RecordingSink};
use user_data_server::{InMemoryStore, UserCandidate, UserDataService, UserRecord};

fn optional_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        6 => "[a-zA-Z ]{1,20}".prop_map(Some),
    ]
}

fn optional_email() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        1 => "[a-z]{1,8}".prop_map(Some),
        5 => ("[a-z]{1,8}", prop::sample::select(vec!["x.com", "y.org", "z.net", "a.io"]))
            .prop_map(|(local, domain)| Some(format!("{}@{}", local, domain))),
    ]
}

prop_compose! {
    fn user_record()(name in optional_field(), email in optional_email()) -> UserRecord {
        UserRecord { name, email }
    }
}

fn candidate_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        8 => user_record().prop_map(|r| serde_json::to_value(r).unwrap()),
        1 => Just(json!(null)),
        1 => any::<i64>().prop_map(|n| json!(n)),
    ]
}

fn report_for(records: &[UserRecord]) -> user_data_server::AnalysisReport {
    let sink = NoopSink;
    let mut tracker = ProgressTracker::percent(&sink);
    generate_report(records, &mut tracker)
}

proptest! {
    #[test]
    fn report_counts_partition_the_collection(records in prop::collection::vec(user_record(), 0..40)) {
        let report = report_for(&records);
        prop_assert_eq!(report.summary.valid_count + report.summary.invalid_count, report.summary.total);
        prop_assert_eq!(report.summary.total, records.len());
        prop_assert_eq!(report.data_quality.issues_found, report.summary.invalid_count);
    }

    #[test]
    fn validity_percentage_is_bounded(records in prop::collection::vec(user_record(), 0..40)) {
        let report = report_for(&records);
        let pct = report.data_quality.validity_percentage;
        prop_assert!((0.0..=100.0).contains(&pct));
        if records.is_empty() {
            prop_assert_eq!(pct, 0.0);
        }
    }

    #[test]
    fn report_histogram_counts_valid_records_with_at(records in prop::collection::vec(user_record(), 0..40)) {
        let report = report_for(&records);
        let expected = records
            .iter()
            .filter(|r| r.is_valid() && r.email_or_empty().contains('@'))
            .count();
        prop_assert_eq!(report.domain_analysis.total(), expected);
    }

    #[test]
    fn average_name_length_is_rounded_mean(records in prop::collection::vec(user_record(), 1..40)) {
        let sink = NoopSink;
        let mut tracker = ProgressTracker::percent(&sink);
        let stats = compute_basic_stats(&records, &mut tracker);

        let sum: usize = records.iter().map(UserRecord::name_len).sum();
        let mean = sum as f64 / records.len() as f64;
        prop_assert_eq!(stats.average_name_length, (mean * 100.0).round() / 100.0);
        prop_assert_eq!(stats.total, records.len());
    }

    #[test]
    fn stats_progress_is_monotonic(records in prop::collection::vec(user_record(), 0..30)) {
        let sink = RecordingSink::new();
        let mut tracker = ProgressTracker::percent(&sink);
        compute_basic_stats(&records, &mut tracker);

        let values = sink.progress_values();
        prop_assert!(values.windows(2).all(|w| w[0].0 <= w[1].0));
        prop_assert!(values.iter().all(|&(current, total)| total == 100 && current <= 100));
        prop_assert_eq!(values.last().copied(), Some((100, 100)));
    }

    #[test]
    fn bulk_counts_add_up(
        existing in prop::collection::vec(user_record(), 0..10),
        batch in prop::collection::vec(candidate_value(), 0..25),
    ) {
        let candidates: Vec<UserCandidate> = batch.iter().map(UserCandidate::from_value).collect();
        let valid = candidates.iter().filter(|c| c.validate().is_ok()).count();
        let service = UserDataService::new(InMemoryStore::with_records(existing.clone()));

        let result = tokio_test::block_on(service.bulk_add(&candidates, &NoopSink)).unwrap();
        prop_assert_eq!(result.successful + result.failed, result.total_processed);
        prop_assert_eq!(result.total_processed, candidates.len());
        prop_assert_eq!(result.successful, valid);
        prop_assert_eq!(result.errors.len(), result.failed);

        let count = tokio_test::block_on(service.count_users(&NoopSink)).unwrap();
        prop_assert_eq!(count, existing.len() + valid);
    }
}
