//! Resource handlers for MCP integration
//!
//! Every resource payload is a JSON object:
//!
//! - `data://users` - `{"users": [...]}`
//! - `data://users/stats` - `{"stats": {...}}`
//! - `data://users/report` - `{"report": {...}}` or `{"report": "No data available"}`
//! - `data://users/{user_name}` - `{"user": {...}}`, or `{"user": null, "error": ...}`
//!   when no user matches

use crate::error::{UserDataError, UserDataResult};
use crate::mcp_integration::core::UserDataMcpServer;
use crate::mcp_integration::tools::{USER_REPORT_URI, USER_STATS_URI, USER_URI_PREFIX, USERS_URI};
use crate::progress::ProgressSink;
use crate::service::{UserLookup, validate_lookup_name};
use crate::storage::RecordStore;
use percent_encoding::percent_decode_str;
use serde_json::{Value, json};

/// A parsed `data://` resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRoute {
    Users,
    Stats,
    Report,
    /// Percent-decoded user name from the template.
    User(String),
}

impl ResourceRoute {
    /// Parse a resource URI. Fixed resources take precedence over the template.
    pub fn parse(uri: &str) -> UserDataResult<Self> {
        match uri {
            USERS_URI => Ok(Self::Users),
            USER_STATS_URI => Ok(Self::Stats),
            USER_REPORT_URI => Ok(Self::Report),
            _ => {
                let encoded = uri
                    .strip_prefix(USER_URI_PREFIX)
                    .ok_or_else(|| UserDataError::invalid_request(format!("Unknown resource: {}", uri)))?;
                let name = percent_decode_str(encoded).decode_utf8().map_err(|_| {
                    UserDataError::invalid_request(format!("Resource name is not valid UTF-8: {}", uri))
                })?;
                Ok(Self::User(validate_lookup_name(&name)?.to_string()))
            }
        }
    }
}

/// Read a resource by URI.
pub async fn handle_read_resource<S: RecordStore>(
    server: &UserDataMcpServer<S>,
    uri: &str,
    progress: &dyn ProgressSink,
) -> UserDataResult<Value> {
    let service = &server.service;
    match ResourceRoute::parse(uri)? {
        ResourceRoute::Users => {
            let users = service.list_users(progress).await?;
            Ok(json!({ "users": users }))
        }
        ResourceRoute::Stats => {
            let stats = service.basic_stats(progress).await?;
            Ok(json!({ "stats": stats }))
        }
        ResourceRoute::Report => {
            let report = service.generate_report(progress).await?;
            Ok(json!({ "report": report }))
        }
        ResourceRoute::User(name) => match service.find_user(&name, progress).await? {
            UserLookup::Found(user) => Ok(json!({ "user": user })),
            UserLookup::NotFound { name } => {
                progress.error(&format!("User not found with name: {}", name));
                Ok(json!({
                    "user": Value::Null,
                    "error": UserDataError::NotFound { name }.to_string()
                }))
            }
        },
    }
}
