//! Core MCP integration infrastructure
//!
//! Server metadata, the tool result type and the server wrapper that the
//! protocol, handler and transport modules build on.

use crate::config::ServerInfo;
use crate::error::UserDataError;
use crate::service::UserDataService;
use crate::storage::{RecordStore, StorageError};
use serde::Serialize;
use serde_json::{Value, json};

/// Information about the MCP server for client discovery
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "mcp")]
/// use user_data_server::mcp_integration::McpServerInfo;
///
/// # #[cfg(feature = "mcp")]
/// let server_info = McpServerInfo {
///     name: "Team Directory".to_string(),
///     version: "1.0.0".to_string(),
///     description: "User records for the platform team".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerInfo {
    /// Human-readable name of the server
    pub name: String,
    /// Version string for the server implementation
    pub version: String,
    /// Description surfaced as the server's instructions
    pub description: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        ServerInfo::default().into()
    }
}

impl From<ServerInfo> for McpServerInfo {
    fn from(info: ServerInfo) -> Self {
        Self {
            name: info.name,
            version: info.version,
            description: info.description,
        }
    }
}

/// Tool execution result for MCP clients
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "mcp")]
/// use user_data_server::mcp_integration::ToolResult;
/// use serde_json::json;
///
/// # #[cfg(feature = "mcp")]
/// let result = ToolResult {
///     success: true,
///     content: json!({"status": "success", "message": "User Alice added"}),
///     metadata: Some(json!({"operation": "write_user"})),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Whether the tool execution was successful
    pub success: bool,
    /// The result payload, or `{"error", "error_code"}` on failure
    pub content: Value,
    /// Optional context about the operation
    pub metadata: Option<Value>,
}

impl ToolResult {
    /// Successful result tagged with the operation name.
    pub fn ok(operation: &str, content: Value) -> Self {
        Self {
            success: true,
            content,
            metadata: Some(json!({ "operation": operation })),
        }
    }

    /// Failed result carrying the error message and its code.
    pub fn failure(operation: &str, error: &UserDataError) -> Self {
        Self {
            success: false,
            content: json!({
                "error": error.to_string(),
                "error_code": error.error_code()
            }),
            metadata: Some(json!({ "operation": operation })),
        }
    }

    /// Build a result from a service outcome whose success value serializes to JSON.
    pub fn from_outcome<T: Serialize>(operation: &str, outcome: Result<T, UserDataError>) -> Self {
        let content = outcome.and_then(|value| {
            serde_json::to_value(value).map_err(|e| StorageError::Serialization(e).into())
        });
        match content {
            Ok(content) => Self::ok(operation, content),
            Err(error) => Self::failure(operation, &error),
        }
    }

    /// Error message when the call failed.
    pub fn error_message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.content.get("error").and_then(Value::as_str)
    }
}

/// MCP server wrapper for user data operations
///
/// Wraps a [`UserDataService`] and exposes its operations as MCP tools,
/// resources and prompts.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "mcp")]
/// use user_data_server::{UserDataService, mcp_integration::UserDataMcpServer};
/// use user_data_server::storage::InMemoryStore;
///
/// # #[cfg(feature = "mcp")]
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = UserDataService::new(InMemoryStore::new());
///     let mcp_server = UserDataMcpServer::new(service);
///
///     println!("Available tools: {}", mcp_server.get_tools().len());
///     mcp_server.run_stdio().await?;
///     Ok(())
/// }
/// ```
pub struct UserDataMcpServer<S: RecordStore> {
    pub(crate) service: UserDataService<S>,
    pub(crate) server_info: McpServerInfo,
}

impl<S: RecordStore> UserDataMcpServer<S> {
    /// Create a new MCP server with default server information
    pub fn new(service: UserDataService<S>) -> Self {
        Self {
            service,
            server_info: McpServerInfo::default(),
        }
    }

    /// Create a new MCP server with custom server information
    pub fn with_info(service: UserDataService<S>, server_info: McpServerInfo) -> Self {
        Self {
            service,
            server_info,
        }
    }

    pub fn server_info(&self) -> &McpServerInfo {
        &self.server_info
    }

    /// The wrapped service.
    pub fn service(&self) -> &UserDataService<S> {
        &self.service
    }
}
