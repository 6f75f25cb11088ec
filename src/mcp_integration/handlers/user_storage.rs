//! Storage tool handlers for MCP integration
//!
//! `write_user`, `get_user_count` and `bulk_add_users`.

use super::string_argument;
use crate::error::UserDataError;
use crate::mcp_integration::core::{ToolResult, UserDataMcpServer};
use crate::model::UserCandidate;
use crate::progress::ProgressSink;
use crate::storage::RecordStore;
use serde_json::Value;

/// Handle single user creation through MCP
///
/// Both `name` and `email` must be strings. Empty strings are stored as given.
pub async fn handle_write_user<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    arguments: Value,
    progress: &dyn ProgressSink,
) -> ToolResult {
    let parsed = string_argument(&arguments, "name")
        .and_then(|name| Ok((name, string_argument(&arguments, "email")?)));
    let (name, email) = match parsed {
        Ok(fields) => fields,
        Err(e) => return ToolResult::failure("write_user", &e),
    };

    let outcome = server
        .service
        .add_user(name, email, progress)
        .await
        .map_err(UserDataError::from);
    ToolResult::from_outcome("write_user", outcome)
}

/// Handle the user count query through MCP
pub async fn handle_get_user_count<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    _arguments: Value,
    progress: &dyn ProgressSink,
) -> ToolResult {
    let outcome = server
        .service
        .count_users(progress)
        .await
        .map_err(UserDataError::from);
    ToolResult::from_outcome("get_user_count", outcome)
}

/// Handle bulk user creation through MCP
///
/// `users_data` must be an array; its elements may be arbitrary JSON and are
/// validated one by one.
pub async fn handle_bulk_add_users<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    arguments: Value,
    progress: &dyn ProgressSink,
) -> ToolResult {
    let candidates: Vec<UserCandidate> = match arguments.get("users_data").and_then(Value::as_array) {
        Some(entries) => entries.iter().map(UserCandidate::from_value).collect(),
        None => {
            return ToolResult::failure(
                "bulk_add_users",
                &UserDataError::invalid_request("Missing users_data parameter"),
            );
        }
    };

    let outcome = server
        .service
        .bulk_add(&candidates, progress)
        .await
        .map_err(UserDataError::from);
    ToolResult::from_outcome("bulk_add_users", outcome)
}
