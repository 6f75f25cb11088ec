//! Analysis tool schema definitions for MCP integration

use serde_json::{Value, json};

/// Schema definition for the user analysis tool
pub fn analyze_users_tool() -> Value {
    json!({
        "name": "analyze_users",
        "description": "Analyze user data and provide insights on email domains, names and data quality",
        "inputSchema": {
            "type": "object",
            "properties": {}
        }
    })
}

/// Schema definition for the long running simulation tool
pub fn process_users_simulation_tool() -> Value {
    json!({
        "name": "process_users_simulation",
        "description": "Simulate a long-running user processing task with progress reporting",
        "inputSchema": {
            "type": "object",
            "properties": {
                "duration_seconds": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "How long the simulated task runs"
                }
            },
            "required": ["duration_seconds"]
        }
    })
}
