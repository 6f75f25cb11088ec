//! User data server library.
//!
//! Stores a small collection of user records (name + email) in a JSON file and
//! exposes staged analytics and bulk mutation over them, with progress
//! reporting, to Model Context Protocol clients.
//!
//! # Core Components
//!
//! - [`UserDataService`] - Transport independent operations
//! - [`storage::RecordStore`] - Trait for the backing store (JSON file or in-memory)
//! - [`analytics`] - Statistics, data quality report and insights
//! - [`progress::ProgressSink`] - Destination for progress and status events
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use user_data_server::{ServerConfig, UserDataService};
//! use user_data_server::progress::LogSink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder().data_dir("data").build()?;
//! let service = UserDataService::from_config(&config).await?;
//!
//! service.add_user("Alice", "alice@x.com", &LogSink).await?;
//! let report = service.generate_report(&LogSink).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod bulk;
pub mod config;
pub mod error;
/// Model Context Protocol integration.
///
/// This module is only available when the `mcp` feature is enabled.
#[cfg(feature = "mcp")]
pub mod mcp_integration;
pub mod model;
pub mod progress;
pub mod service;
pub mod simulation;
pub mod storage;

// Re-export commonly used types for convenience
pub use analytics::{AnalysisOutcome, AnalysisReport, BasicStats, ReportOutcome, StatsOutcome};
pub use bulk::{BulkResult, BulkStatus};
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder, ServerInfo};
pub use error::{UserDataError, UserDataResult, ValidationError};
pub use model::{RecordCollection, UserCandidate, UserRecord};
pub use service::{AddUserConfirmation, UserDataService, UserLookup};
pub use storage::{InMemoryStore, JsonFileStore, RecordStore, StorageError};

/// Model Context Protocol integration types.
///
/// These types are only available when the `mcp` feature is enabled.
#[cfg(feature = "mcp")]
pub use mcp_integration::{McpServerInfo, ToolResult, UserDataMcpServer};
