//! MCP transport built on the `rmcp` server runtime.
//!
//! [`UserDataMcpServer`] implements [`ServerHandler`]: each request is routed
//! to the discovery and dispatch methods in `protocol`. While a tool call,
//! resource read or prompt request runs, its events go through a
//! [`ChannelSink`] and reach the client ahead of the response. Status messages
//! are always sent, as logging notifications. Progress is sent only when the
//! request carried a progress token.
//!
//! When the client advertised `sampling`, `analyze_users` asks the client's
//! model for strategic insights (see [`SamplingInsightGenerator`]).

use super::core::{ToolResult, UserDataMcpServer};
use super::sampling::SamplingInsightGenerator;
use super::tools::JSON_MIME_TYPE;
use crate::analytics::TextInsightGenerator;
use crate::error::UserDataError;
use crate::progress::{ChannelSink, LogSink, MessageLevel, ProgressEvent, TeeSink};
use crate::storage::RecordStore;
use log::{debug, info};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, LoggingLevel, LoggingMessageNotificationParam, PaginatedRequestParam,
    ProgressNotificationParam, ProgressToken, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::future::Future;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc::UnboundedReceiver;

const LOGGER_NAME: &str = "user-data-server";

impl From<UserDataError> for McpError {
    fn from(error: UserDataError) -> Self {
        let message = error.to_string();
        let data = Some(json!({ "error_code": error.error_code() }));
        match error {
            UserDataError::InvalidRequest { .. }
            | UserDataError::Validation(_)
            | UserDataError::NotFound { .. } => McpError::invalid_params(message, data),
            UserDataError::Storage(_) | UserDataError::Config(_) => {
                McpError::internal_error(message, data)
            }
        }
    }
}

/// Convert a JSON payload built by the descriptor and handler modules into its
/// protocol type.
fn protocol_value<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value)
        .map_err(|e| McpError::internal_error(format!("Malformed protocol payload: {}", e), None))
}

fn logging_level(level: MessageLevel) -> LoggingLevel {
    match level {
        MessageLevel::Debug => LoggingLevel::Debug,
        MessageLevel::Info => LoggingLevel::Info,
        MessageLevel::Warning => LoggingLevel::Warning,
        MessageLevel::Error => LoggingLevel::Error,
    }
}

fn progress_notification(
    token: &ProgressToken,
    current: u64,
    total: u64,
) -> Result<ProgressNotificationParam, McpError> {
    protocol_value(json!({ "progressToken": token, "progress": current, "total": total }))
}

/// Tool result as sent to the client: the payload as text, plus the payload
/// itself as structured content when it is an object.
pub fn tool_call_result(result: ToolResult) -> CallToolResult {
    let text = match &result.content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    let mut response = if result.success {
        CallToolResult::success(vec![Content::text(text)])
    } else {
        CallToolResult::error(vec![Content::text(text)])
    };
    if result.content.is_object() {
        response.structured_content = Some(result.content);
    }
    response
}

/// Send the events of one request to its client until the sending side closes.
async fn forward_events(
    mut events: UnboundedReceiver<ProgressEvent>,
    context: &RequestContext<RoleServer>,
) {
    let progress_token = context.meta.get_progress_token();
    while let Some(event) = events.recv().await {
        let sent = match event {
            ProgressEvent::Progress { current, total } => {
                let Some(token) = &progress_token else {
                    continue;
                };
                match progress_notification(token, current, total) {
                    Ok(param) => context.peer.notify_progress(param).await,
                    Err(e) => {
                        debug!("Progress notification skipped: {}", e.message);
                        continue;
                    }
                }
            }
            ProgressEvent::Message { level, text } => {
                context
                    .peer
                    .notify_logging_message(LoggingMessageNotificationParam {
                        level: logging_level(level),
                        logger: Some(LOGGER_NAME.to_string()),
                        data: Value::String(text),
                    })
                    .await
            }
        };
        if let Err(e) = sent {
            debug!("Client notification dropped: {}", e);
        }
    }
}

/// Run `work` while forwarding its events; `work` must own the [`ChannelSink`]
/// feeding `events` so the forwarder stops when it completes.
async fn with_client_events<F: Future>(
    work: F,
    events: UnboundedReceiver<ProgressEvent>,
    context: &RequestContext<RoleServer>,
) -> F::Output {
    let (output, ()) = tokio::join!(work, forward_events(events, context));
    output
}

impl<S: RecordStore + 'static> ServerHandler for UserDataMcpServer<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_logging()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: self.server_info.name.clone(),
                version: self.server_info.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(self.server_info.description.clone()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        protocol_value(json!({ "tools": self.get_tools() }))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or_else(|| json!({}));
        let sampling = SamplingInsightGenerator::for_client(&context.peer);
        let insights = sampling.as_ref().map(|g| g as &dyn TextInsightGenerator);

        let (channel, events) = ChannelSink::channel();
        let call = async move {
            let sink = TeeSink::new(&LogSink, &channel);
            self.execute_tool_in_session(&request.name, arguments, insights, &sink)
                .await
        };
        let result = with_client_events(call, events, &context).await;
        Ok(tool_call_result(result))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        protocol_value(json!({ "resources": self.list_resources() }))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        protocol_value(json!({ "resourceTemplates": self.list_resource_templates() }))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        let (channel, events) = ChannelSink::channel();
        let read = {
            let uri = uri.clone();
            async move {
                let sink = TeeSink::new(&LogSink, &channel);
                self.read_resource(&uri, &sink).await
            }
        };
        let payload = with_client_events(read, events, &context).await?;

        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        protocol_value(json!({
            "contents": [{ "uri": uri, "mimeType": JSON_MIME_TYPE, "text": text }]
        }))
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        protocol_value(json!({ "prompts": self.list_prompts() }))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let name = request.name;
        let arguments = request.arguments.map(Value::Object).unwrap_or_else(|| json!({}));
        let (channel, events) = ChannelSink::channel();
        let render = {
            let name = name.clone();
            async move {
                let sink = TeeSink::new(&LogSink, &channel);
                self.get_prompt(&name, &arguments, &sink).await
            }
        };
        let text = with_client_events(render, events, &context).await?;

        protocol_value(json!({
            "description": self.prompt_description(&name),
            "messages": [{ "role": "user", "content": { "type": "text", "text": text } }]
        }))
    }
}

impl<S: RecordStore + 'static> UserDataMcpServer<S> {
    /// Serve MCP over the process's stdin and stdout until the client disconnects.
    pub async fn run_stdio(self) -> io::Result<()> {
        info!("{} MCP server ready for stdio communication", self.server_info.name);
        info!(
            "Available tools: {:?}",
            self.get_tools()
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str).map(str::to_string))
                .collect::<Vec<_>>()
        );
        self.serve_io(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve MCP over an arbitrary byte stream pair until the client disconnects.
    pub async fn serve_io<R, W>(self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let running = self
            .serve((reader, writer))
            .await
            .map_err(|e| io::Error::other(format!("MCP initialization failed: {}", e)))?;
        let reason = running.waiting().await.map_err(io::Error::other)?;
        info!("MCP session closed: {:?}", reason);
        Ok(())
    }
}
