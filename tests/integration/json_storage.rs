//! On-disk document layout and failure handling of the JSON store.

use crate::common::{read_users_document, temp_service, write_users_document};
use serde_json::json;
use user_data_server::progress::NoopSink;
use user_data_server::storage::RecordStore;
use user_data_server::{
    ConfigError, JsonFileStore, RecordCollection, ServerConfig, UserDataError, UserDataService,
    UserRecord,
};

#[tokio::test]
async fn config_controls_the_file_location() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::builder()
        .data_dir(dir.path().join("nested").join("store"))
        .users_file("people.json")
        .build()
        .unwrap();
    let service = UserDataService::from_config(&config).await.unwrap();
    assert!(dir.path().join("nested").join("store").is_dir());

    service.add_user("Alice", "alice@x.com", &NoopSink).await.unwrap();
    assert!(config.users_path().is_file());
    assert_eq!(service.store().path(), config.users_path());
}

#[test]
fn invalid_file_names_are_rejected() {
    let err = ServerConfig::builder().users_file("../escape.json").build().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUsersFile(_)));
    assert!(matches!(
        ServerConfig::builder().data_dir("").build(),
        Err(ConfigError::EmptyDataDir)
    ));
}

#[tokio::test]
async fn directory_in_place_of_file_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data").join("users.json")).unwrap();
    let config = ServerConfig::builder().data_dir(dir.path().join("data")).build().unwrap();

    let result = UserDataService::from_config(&config).await;
    assert!(matches!(result, Err(UserDataError::Storage(_))));
}

#[tokio::test]
async fn unknown_fields_are_tolerated_and_dropped_on_save() {
    let (dir, _) = temp_service().await;
    write_users_document(
        dir.path(),
        &json!({"version": 2, "users": [{"name": "Alice", "email": "alice@x.com", "age": 30}]}),
    );
    let service = crate::common::service_in(dir.path()).await;

    service.add_user("Bob", "bob@y.com", &NoopSink).await.unwrap();
    assert_eq!(
        read_users_document(dir.path()),
        json!({"users": [
            {"name": "Alice", "email": "alice@x.com"},
            {"name": "Bob", "email": "bob@y.com"}
        ]})
    );
}

#[tokio::test]
async fn saved_document_is_pretty_printed() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("users.json")).await.unwrap();
    store
        .save(&RecordCollection::stored(vec![UserRecord::new("Alice", "alice@x.com")]))
        .await
        .unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.starts_with("{\n  \"users\": ["));
    assert!(!dir.path().join("users.json.tmp").exists());
}

#[tokio::test]
async fn wrongly_typed_users_member_is_corruption() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &json!({"users": "everyone"}));
    let service = crate::common::service_in(dir.path()).await;

    let err = service.list_users(&NoopSink).await.unwrap_err();
    assert!(err.is_corruption());
}

#[tokio::test]
async fn wrongly_shaped_entries_count_as_invalid_users() {
    let (dir, _) = temp_service().await;
    write_users_document(
        dir.path(),
        &json!({"users": [
            {"name": "Alice", "email": "alice@x.com"},
            "garbage",
            {"name": 42, "email": "n@x.com"}
        ]}),
    );
    let service = crate::common::service_in(dir.path()).await;

    assert_eq!(service.count_users(&NoopSink).await.unwrap(), 3);

    let outcome = service.generate_report(&NoopSink).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.valid_count, 1);
    assert_eq!(report.summary.invalid_count, 2);
    assert_eq!(report.data_quality.issues_found, 2);
}
