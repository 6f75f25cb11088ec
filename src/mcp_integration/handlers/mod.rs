//! MCP integration handlers
//!
//! Tool handlers turn JSON arguments into service calls and wrap the outcome in
//! a [`super::ToolResult`]; resource and prompt handlers return the payload or a
//! [`crate::UserDataError`] for the transport to report.

pub mod analysis;
pub mod prompts;
pub mod resources;
pub mod user_storage;

pub use analysis::*;
pub use prompts::*;
pub use resources::*;
pub use user_storage::*;

use crate::error::UserDataError;
use serde_json::Value;

/// Required string argument.
pub(crate) fn string_argument<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, UserDataError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| UserDataError::invalid_request(format!("Missing {} parameter", key)))
}
