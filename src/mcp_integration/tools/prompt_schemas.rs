//! Prompt descriptors for MCP integration

use serde_json::{Value, json};

pub fn user_management_assistant_prompt() -> Value {
    json!({
        "name": "user_management_assistant",
        "description": "Template for user data management assistant",
        "arguments": []
    })
}

pub fn data_analysis_prompt() -> Value {
    json!({
        "name": "data_analysis_prompt",
        "description": "Template for analyzing user data",
        "arguments": [
            {
                "name": "analysis_type",
                "description": "summary (default), detailed, quality or demographic",
                "required": false
            }
        ]
    })
}

pub fn interactive_user_prompt() -> Value {
    json!({
        "name": "interactive_user_prompt",
        "description": "Interactive prompt personalised with the caller's name and preferred analysis level",
        "arguments": [
            {
                "name": "user_name",
                "description": "How the assistant should address the user",
                "required": true
            },
            {
                "name": "analysis_level",
                "description": "basic or detailed",
                "required": true
            }
        ]
    })
}
