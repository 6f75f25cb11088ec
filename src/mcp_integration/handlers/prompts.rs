//! Prompt handlers for MCP integration
//!
//! Prompts render plain text. The assistant and analysis prompts embed live
//! figures from storage; a storage failure only drops those figures.

use super::string_argument;
use crate::analytics::StatsOutcome;
use crate::error::{UserDataError, UserDataResult};
use crate::mcp_integration::core::UserDataMcpServer;
use crate::progress::ProgressSink;
use crate::storage::RecordStore;
use serde_json::Value;

pub const DEFAULT_ANALYSIS_TYPE: &str = "summary";

/// Render a prompt by name.
pub async fn handle_get_prompt<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    name: &str,
    arguments: &Value,
    progress: &dyn ProgressSink,
) -> UserDataResult<String> {
    match name {
        "user_management_assistant" => Ok(user_management_assistant(server, progress).await),
        "data_analysis_prompt" => {
            let analysis_type = arguments
                .get("analysis_type")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_ANALYSIS_TYPE);
            Ok(data_analysis(server, analysis_type, progress).await)
        }
        "interactive_user_prompt" => {
            let user_name = string_argument(arguments, "user_name")?;
            let analysis_level = string_argument(arguments, "analysis_level")?;
            progress.info(&format!("Interactive setup completed for {}", user_name));
            Ok(interactive_user(user_name, analysis_level))
        }
        _ => Err(UserDataError::invalid_request(format!("Unknown prompt: {}", name))),
    }
}

async fn user_management_assistant<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    progress: &dyn ProgressSink,
) -> String {
    progress.info("Generating user management assistant prompt");
    let current_count = match server.service.count_users(progress).await {
        Ok(count) => count,
        Err(_) => {
            progress.warning("Could not retrieve current user count");
            0
        }
    };

    format!(
        "You are an assistant that helps manage user data stored in a local file.

Current system status: {current_count} users in storage

Available tools:
- write_user: Adds a new user to the data storage (requires name and email)
- get_user_count: Returns the total number of users in storage
- analyze_users: Analyzes user data and provides insights
- bulk_add_users: Adds many users at once and reports which entries were rejected
- process_users_simulation: Runs a simulated long task with progress updates

Available resources:
- data://users: Returns all users from the data storage
- data://users/{{user_name}}: Returns a specific user by name
- data://users/stats: Returns statistics about users
- data://users/report: Returns a data quality report

Please help the user manage their data efficiently using the file-based storage system."
    )
}

async fn data_analysis<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    analysis_type: &str,
    progress: &dyn ProgressSink,
) -> String {
    progress.info(&format!("Generating {} analysis prompt", analysis_type));

    let stats_context = match server.service.basic_stats(progress).await {
        Ok(StatsOutcome::Stats(stats)) => {
            let domains: Vec<&str> = stats.domains.domains().collect();
            format!(
                "\n\nCurrent data overview: {} users with domains: [{}]",
                stats.total,
                domains.join(", ")
            )
        }
        Ok(StatsOutcome::NoData) => "\n\nCurrent data overview: 0 users with domains: []".to_string(),
        Err(_) => {
            progress.warning("Could not retrieve current stats");
            String::new()
        }
    };

    format!(
        "Please perform a {analysis_type} analysis of the user data.

Use the data://users resource to access all user information.
Focus on providing insights about user patterns, email domains, and data quality.{stats_context}"
    )
}

fn interactive_user(user_name: &str, analysis_level: &str) -> String {
    format!(
        "Hello {user_name}! I'm here to help you manage your user data.

Based on your preference for {analysis_level} analysis, I'll adjust my responses accordingly.

You can ask me to:
- Add new users to the system
- Analyze existing user data
- Get statistics about your users
- Retrieve specific user information

What would you like to do first?"
    )
}
