//! MCP (Model Context Protocol) integration
//!
//! Exposes the [`crate::UserDataService`] operations to MCP clients as tools,
//! resources and prompts, served over stdio by the `rmcp` runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   MCP Client    │───▶│  MCP Protocol    │───▶│ UserDataService │
//! │   (stdio)       │    │  (This Module)   │    │  (Operations)   │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//!          ▲                        │                       │
//!          │                        ▼                       ▼
//!    notifications/progress   Tool dispatch           Record store
//!    notifications/message    Resource routing        Analytics
//!    sampling/createMessage
//! ```
//!
//! ## Module Structure
//!
//! - `core` - Server metadata, [`ToolResult`] and [`UserDataMcpServer`]
//! - `protocol` - Discovery and dispatch of tools, resources and prompts
//! - `tools/` - JSON descriptors returned by the list methods
//! - `handlers/` - Tool, resource and prompt handlers
//! - `transport` - `rmcp` server handler and the stdio entry point
//! - `sampling` - Insight generation through the client's model
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "mcp")]
//! use user_data_server::{UserDataService, mcp_integration::UserDataMcpServer};
//! use user_data_server::storage::InMemoryStore;
//! use serde_json::json;
//!
//! # #[cfg(feature = "mcp")]
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mcp_server = UserDataMcpServer::new(UserDataService::new(InMemoryStore::new()));
//!
//!     let result = mcp_server
//!         .execute_tool("write_user", json!({"name": "Alice", "email": "alice@x.com"}))
//!         .await;
//!
//!     if result.success {
//!         println!("User added");
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod handlers;
pub mod protocol;
pub mod sampling;
pub mod tools;
pub mod transport;


pub use core::{McpServerInfo, ToolResult, UserDataMcpServer};
pub use sampling::SamplingInsightGenerator;
