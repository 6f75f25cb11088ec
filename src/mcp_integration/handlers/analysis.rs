//! Analysis tool handlers for MCP integration
//!
//! `analyze_users` and `process_users_simulation`.

use crate::analytics::TextInsightGenerator;
use crate::error::UserDataError;
use crate::mcp_integration::core::{ToolResult, UserDataMcpServer};
use crate::progress::ProgressSink;
use crate::storage::RecordStore;
use serde_json::Value;

/// Handle user analysis through MCP
///
/// `insights` takes precedence over the service's configured generator. The
/// call succeeds whether or not either is available.
pub async fn handle_analyze_users<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    _arguments: Value,
    insights: Option<&dyn TextInsightGenerator>,
    progress: &dyn ProgressSink,
) -> ToolResult {
    let outcome = match insights {
        Some(generator) => server.service.analyze_with(Some(generator), progress).await,
        None => server.service.analyze(progress).await,
    }
    .map_err(UserDataError::from);
    ToolResult::from_outcome("analyze_users", outcome)
}

/// Handle the long running simulation through MCP
pub async fn handle_process_users_simulation<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    arguments: Value,
    progress: &dyn ProgressSink,
) -> ToolResult {
    let Some(duration_seconds) = arguments.get("duration_seconds").and_then(Value::as_u64) else {
        return ToolResult::failure(
            "process_users_simulation",
            &UserDataError::invalid_request(
                "duration_seconds must be a non-negative integer",
            ),
        );
    };

    let summary = server
        .service
        .simulate_long_running_task(duration_seconds, progress)
        .await;
    ToolResult::from_outcome("process_users_simulation", Ok(summary))
}
