//! Scripted MCP client driving a server over an in-process pipe.
//!
//! The client speaks raw line-delimited JSON-RPC so tests see exactly what a
//! real client would receive. Requests the server sends back (sampling, ping)
//! are answered from the script while waiting for a response.

use serde_json::{Value, json};
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use user_data_server::mcp_integration::UserDataMcpServer;
use user_data_server::storage::RecordStore;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the server sent for one request.
#[derive(Debug)]
pub struct Exchange {
    pub notifications: Vec<Value>,
    pub response: Value,
}

impl Exchange {
    /// Notifications with the given method, in arrival order.
    pub fn notifications(&self, method: &str) -> Vec<&Value> {
        self.notifications
            .iter()
            .filter(|n| n["method"] == method)
            .collect()
    }
}

pub struct ScriptedClient {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
    server: JoinHandle<std::io::Result<()>>,
    next_id: u64,
    sampling_reply: Option<String>,
    sampling_requests: Vec<Value>,
}

impl ScriptedClient {
    /// Start `server` and complete the handshake, advertising `capabilities`.
    ///
    /// Returns the client and the `initialize` result.
    pub async fn connect<S: RecordStore + 'static>(
        server: UserDataMcpServer<S>,
        capabilities: Value,
    ) -> (Self, Value) {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);
        let server = tokio::spawn(server.serve_io(server_read, server_write));

        let (read, writer) = tokio::io::split(client_io);
        let mut client = Self {
            lines: BufReader::new(read).lines(),
            writer,
            server,
            next_id: 0,
            sampling_reply: None,
            sampling_requests: Vec::new(),
        };

        let init = client
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": capabilities,
                    "clientInfo": {"name": "scripted-client", "version": "1.0.0"}
                }),
            )
            .await;
        client
            .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        (client, init.response)
    }

    /// Answer `sampling/createMessage` requests with `text`.
    pub fn answer_sampling_with(&mut self, text: &str) {
        self.sampling_reply = Some(text.to_string());
    }

    /// Sampling requests received so far.
    pub fn sampling_requests(&self) -> &[Value] {
        &self.sampling_requests
    }

    /// Send a request and collect everything up to its response.
    pub async fn request(&mut self, method: &str, params: Value) -> Exchange {
        self.next_id += 1;
        let id = self.next_id;
        self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await;

        let mut notifications = Vec::new();
        loop {
            let message = self.receive().await;
            match (message.get("method"), message.get("id")) {
                (Some(_), Some(_)) => self.answer_server_request(message).await,
                (Some(_), None) => notifications.push(message),
                (None, Some(response_id)) if *response_id == json!(id) => {
                    return Exchange {
                        notifications,
                        response: message,
                    };
                }
                _ => panic!("unexpected message from server: {}", message),
            }
        }
    }

    /// `tools/call` shorthand.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Exchange {
        self.request("tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }

    /// Disconnect and wait for the server to finish.
    pub async fn close(self) -> std::io::Result<()> {
        let Self {
            lines,
            writer,
            server,
            ..
        } = self;
        drop(writer);
        drop(lines);
        server.await.expect("server task")
    }

    async fn answer_server_request(&mut self, request: Value) {
        let id = request["id"].clone();
        let reply = match (request["method"].as_str(), &self.sampling_reply) {
            (Some("sampling/createMessage"), Some(text)) => {
                self.sampling_requests.push(request.clone());
                json!({"jsonrpc": "2.0", "id": id, "result": {
                    "role": "assistant",
                    "content": {"type": "text", "text": text},
                    "model": "scripted-model",
                    "stopReason": "endTurn"
                }})
            }
            (Some("ping"), _) => json!({"jsonrpc": "2.0", "id": id, "result": {}}),
            _ => json!({"jsonrpc": "2.0", "id": id, "error": {
                "code": -32601,
                "message": "Method not found"
            }}),
        };
        self.send(reply).await;
    }

    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .expect("write to server");
        self.writer.flush().await.expect("flush to server");
    }

    async fn receive(&mut self) -> Value {
        let line = tokio::time::timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("server answered in time")
            .expect("read from server")
            .expect("server still connected");
        serde_json::from_str(&line).expect("server sent json")
    }
}
