//! Insights generated by the client's own model.
//!
//! MCP clients that advertise the `sampling` capability accept
//! `sampling/createMessage` requests from the server. [`SamplingInsightGenerator`]
//! turns the analysis prompt into such a request and returns the text of the
//! reply.

use crate::analytics::{InsightError, TextInsightGenerator};
use async_trait::async_trait;
use log::debug;
use rmcp::model::CreateMessageRequestParam;
use rmcp::service::{Peer, RoleServer};
use serde_json::{Value, json};

pub const INSIGHT_TEMPERATURE: f64 = 0.3;
pub const INSIGHT_MAX_TOKENS: u32 = 800;

/// [`TextInsightGenerator`] backed by MCP sampling on the connected client.
#[derive(Clone)]
pub struct SamplingInsightGenerator {
    peer: Peer<RoleServer>,
}

impl SamplingInsightGenerator {
    pub fn new(peer: Peer<RoleServer>) -> Self {
        Self { peer }
    }

    /// Generator for `peer`, if its client advertised sampling during `initialize`.
    pub fn for_client(peer: &Peer<RoleServer>) -> Option<Self> {
        let supported = peer
            .peer_info()
            .is_some_and(|info| info.capabilities.sampling.is_some());
        supported.then(|| Self::new(peer.clone()))
    }
}

/// `sampling/createMessage` parameters for one user-role text prompt.
pub fn sampling_request(prompt: &str) -> Value {
    json!({
        "messages": [
            { "role": "user", "content": { "type": "text", "text": prompt } }
        ],
        "temperature": INSIGHT_TEMPERATURE,
        "maxTokens": INSIGHT_MAX_TOKENS
    })
}

/// Text of a `sampling/createMessage` result.
///
/// `content` may be a single block or a list of blocks; the first text block wins.
pub fn reply_text(reply: &Value) -> Option<String> {
    let content = reply.get("content")?;
    let block = match content {
        Value::Array(blocks) => blocks.iter().find(|b| b["type"] == "text")?,
        block => block,
    };
    block
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl TextInsightGenerator for SamplingInsightGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let request: CreateMessageRequestParam = serde_json::from_value(sampling_request(prompt))
            .map_err(|e| InsightError::Failed(format!("invalid sampling request: {}", e)))?;

        debug!("Requesting insights from client ({} prompt chars)", prompt.len());
        let reply = self
            .peer
            .create_message(request)
            .await
            .map_err(|e| InsightError::Failed(e.to_string()))?;

        let reply = serde_json::to_value(&reply)
            .map_err(|e| InsightError::Failed(format!("unreadable sampling reply: {}", e)))?;
        reply_text(&reply)
            .ok_or_else(|| InsightError::Failed("sampling reply carried no text".to_string()))
    }
}
