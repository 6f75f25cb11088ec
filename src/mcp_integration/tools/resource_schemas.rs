//! Resource descriptors for MCP integration

use serde_json::{Value, json};

pub const USERS_URI: &str = "data://users";
pub const USER_STATS_URI: &str = "data://users/stats";
pub const USER_REPORT_URI: &str = "data://users/report";
/// Prefix of the per-user template `data://users/{user_name}`.
pub const USER_URI_PREFIX: &str = "data://users/";
pub const JSON_MIME_TYPE: &str = "application/json";

pub fn users_resource() -> Value {
    json!({
        "uri": USERS_URI,
        "name": "UserData",
        "description": "Provides access to user data from local storage",
        "mimeType": JSON_MIME_TYPE
    })
}

pub fn user_stats_resource() -> Value {
    json!({
        "uri": USER_STATS_URI,
        "name": "UserStats",
        "description": "Provides statistics about users in storage",
        "mimeType": JSON_MIME_TYPE
    })
}

pub fn user_report_resource() -> Value {
    json!({
        "uri": USER_REPORT_URI,
        "name": "UserReport",
        "description": "Generates a comprehensive user report with progress tracking",
        "mimeType": JSON_MIME_TYPE
    })
}

/// Template for case-insensitive lookup by percent-encoded name.
pub fn single_user_template() -> Value {
    json!({
        "uriTemplate": "data://users/{user_name}",
        "name": "SingleUser",
        "description": "Provides access to a specific user by name",
        "mimeType": JSON_MIME_TYPE
    })
}
