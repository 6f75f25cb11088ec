//! MCP protocol layer for discovery and dispatch
//!
//! Routes tool calls, resource reads and prompt requests to their handlers.
//! Every tool call is timed and logged with its outcome.

use super::core::{ToolResult, UserDataMcpServer};
use super::handlers::{analysis, prompts, resources, user_storage};
use super::tools::{analysis_schemas, prompt_schemas, resource_schemas, user_schemas};
use crate::analytics::TextInsightGenerator;
use crate::error::{UserDataError, UserDataResult};
use crate::progress::{LogSink, ProgressSink};
use crate::storage::RecordStore;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Instant;

impl<S: RecordStore> UserDataMcpServer<S> {
    /// Get the list of available MCP tools as JSON
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "mcp")]
    /// use user_data_server::mcp_integration::UserDataMcpServer;
    /// # fn example(mcp_server: UserDataMcpServer<user_data_server::storage::InMemoryStore>) {
    /// let tools = mcp_server.get_tools();
    /// assert_eq!(tools.len(), 5);
    /// # }
    /// ```
    pub fn get_tools(&self) -> Vec<Value> {
        vec![
            user_schemas::write_user_tool(),
            user_schemas::get_user_count_tool(),
            analysis_schemas::analyze_users_tool(),
            user_schemas::bulk_add_users_tool(),
            analysis_schemas::process_users_simulation_tool(),
        ]
    }

    /// Execute a tool by name, sending progress and status events to the log.
    pub async fn execute_tool(&self, tool_name: &str, arguments: Value) -> ToolResult {
        self.execute_tool_with_progress(tool_name, arguments, &LogSink)
            .await
    }

    /// Execute a tool by name, sending progress and status events to `progress`.
    ///
    /// Unknown tools produce a failed result rather than an error.
    pub async fn execute_tool_with_progress(
        &self,
        tool_name: &str,
        arguments: Value,
        progress: &dyn ProgressSink,
    ) -> ToolResult {
        self.execute_tool_in_session(tool_name, arguments, None, progress)
            .await
    }

    /// Execute a tool on behalf of a connected client.
    ///
    /// `insights` is the client's own text generator (e.g. MCP sampling); when
    /// absent, `analyze_users` falls back to the service's configured one.
    pub async fn execute_tool_in_session(
        &self,
        tool_name: &str,
        arguments: Value,
        insights: Option<&dyn TextInsightGenerator>,
        progress: &dyn ProgressSink,
    ) -> ToolResult {
        debug!("Executing MCP tool: {} with args: {}", tool_name, arguments);
        info!("Tool called: {}", tool_name);
        let started = Instant::now();

        let result = match tool_name {
            // Storage operations
            "write_user" => user_storage::handle_write_user(self, arguments, progress).await,
            "get_user_count" => user_storage::handle_get_user_count(self, arguments, progress).await,
            "bulk_add_users" => user_storage::handle_bulk_add_users(self, arguments, progress).await,

            // Analysis operations
            "analyze_users" => {
                analysis::handle_analyze_users(self, arguments, insights, progress).await
            }
            "process_users_simulation" => {
                analysis::handle_process_users_simulation(self, arguments, progress).await
            }

            // Unknown tool
            _ => ToolResult::failure(
                tool_name,
                &UserDataError::invalid_request(format!("Unknown tool: {}", tool_name)),
            ),
        };

        let elapsed = started.elapsed().as_secs_f64();
        match result.error_message() {
            None => info!("Tool {} completed successfully in {:.2}s", tool_name, elapsed),
            Some(error) => warn!("Tool {} failed after {:.2}s: {}", tool_name, elapsed, error),
        }
        result
    }

    /// Fixed resources.
    pub fn list_resources(&self) -> Vec<Value> {
        vec![
            resource_schemas::users_resource(),
            resource_schemas::user_stats_resource(),
            resource_schemas::user_report_resource(),
        ]
    }

    /// Parameterized resources.
    pub fn list_resource_templates(&self) -> Vec<Value> {
        vec![resource_schemas::single_user_template()]
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str, progress: &dyn ProgressSink) -> UserDataResult<Value> {
        debug!("Reading MCP resource: {}", uri);
        resources::handle_read_resource(self, uri, progress).await
    }

    pub fn list_prompts(&self) -> Vec<Value> {
        vec![
            prompt_schemas::user_management_assistant_prompt(),
            prompt_schemas::data_analysis_prompt(),
            prompt_schemas::interactive_user_prompt(),
        ]
    }

    /// Render a prompt by name with its arguments object.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: &Value,
        progress: &dyn ProgressSink,
    ) -> UserDataResult<String> {
        debug!("Rendering MCP prompt: {}", name);
        prompts::handle_get_prompt(self, name, arguments, progress).await
    }

    /// Description of a prompt, as listed.
    pub(crate) fn prompt_description(&self, name: &str) -> Option<String> {
        self.list_prompts()
            .into_iter()
            .find(|p| p.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|p| p.get("description").and_then(Value::as_str).map(str::to_string))
    }
}
