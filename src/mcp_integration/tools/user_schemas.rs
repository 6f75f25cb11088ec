//! Storage tool schema definitions for MCP integration
//!
//! - [`write_user_tool`] - append a single user
//! - [`get_user_count_tool`] - number of stored users
//! - [`bulk_add_users_tool`] - validate and append many users in one save

use serde_json::{Value, json};

/// Schema definition for the single user insert tool
pub fn write_user_tool() -> Value {
    json!({
        "name": "write_user",
        "description": "Add a new user to the data storage",
        "inputSchema": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full name of the user"
                },
                "email": {
                    "type": "string",
                    "description": "Email address of the user"
                }
            },
            "required": ["name", "email"]
        }
    })
}

/// Schema definition for the user count tool
pub fn get_user_count_tool() -> Value {
    json!({
        "name": "get_user_count",
        "description": "Get the total number of users in storage",
        "inputSchema": {
            "type": "object",
            "properties": {}
        }
    })
}

/// Schema definition for the bulk insert tool
pub fn bulk_add_users_tool() -> Value {
    json!({
        "name": "bulk_add_users",
        "description": "Add multiple users to storage with progress tracking. Invalid entries are reported without stopping the batch",
        "inputSchema": {
            "type": "object",
            "properties": {
                "users_data": {
                    "type": "array",
                    "description": "Users to add",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "email": {"type": "string"}
                        },
                        "required": ["name", "email"]
                    }
                }
            },
            "required": ["users_data"]
        }
    })
}
