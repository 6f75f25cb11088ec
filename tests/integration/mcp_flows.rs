//! Tool, resource and prompt flows through the MCP layer over a JSON store,
//! both called directly and through a client session.

use crate::common::mcp_client::ScriptedClient;
use crate::common::{fixtures, service_in, temp_service, write_users_document};
use serde_json::{Value, json};
use user_data_server::mcp_integration::UserDataMcpServer;
use user_data_server::progress::{NoopSink, RecordingSink};

#[tokio::test]
async fn write_then_read_back_through_resources() {
    let (_dir, service) = temp_service().await;
    let server = UserDataMcpServer::new(service);

    for (name, email) in [("Alice", "alice@x.com"), ("Bob", "bob@y.com")] {
        let result = server
            .execute_tool("write_user", json!({"name": name, "email": email}))
            .await;
        assert!(result.success, "{}", result.content);
    }

    let users = server.read_resource("data://users", &NoopSink).await.unwrap();
    assert_eq!(users["users"][1]["name"], "Bob");

    let stats = server.read_resource("data://users/stats", &NoopSink).await.unwrap();
    assert_eq!(stats["stats"]["most_common_domain"], "x.com");

    let alice = server.read_resource("data://users/ALICE", &NoopSink).await.unwrap();
    assert_eq!(alice["user"]["email"], "alice@x.com");
}

#[tokio::test]
async fn bulk_then_report() {
    let (_dir, service) = temp_service().await;
    let server = UserDataMcpServer::new(service);
    let sink = RecordingSink::new();

    let result = server
        .execute_tool_with_progress(
            "bulk_add_users",
            json!({"users_data": [
                {"name": "Ann", "email": "ann@a.com"},
                {"name": "Ben", "email": "ben@b.com"},
                {"name": "", "email": "blank@b.com"}
            ]}),
            &sink,
        )
        .await;
    assert_eq!(result.content["successful"], 2);
    assert_eq!(sink.progress_values(), vec![(0, 3), (1, 3), (2, 3), (3, 3)]);

    let report = server.read_resource("data://users/report", &NoopSink).await.unwrap();
    assert_eq!(report["report"]["summary"]["total_users"], 2);
    assert_eq!(report["report"]["domain_analysis"], json!({"a.com": 1, "b.com": 1}));
}

#[tokio::test]
async fn client_session_over_json_store() {
    let (_dir, service) = temp_service().await;
    let (mut client, init) = ScriptedClient::connect(UserDataMcpServer::new(service), json!({})).await;

    assert_eq!(init["result"]["serverInfo"]["name"], "UserDataServer");
    assert!(init["result"]["protocolVersion"].is_string());
    assert!(init["result"]["capabilities"]["tools"].is_object());

    let tools = client.request("tools/list", json!({})).await;
    assert_eq!(tools.response["result"]["tools"].as_array().map(Vec::len), Some(5));

    let templates = client.request("resources/templates/list", json!({})).await;
    assert_eq!(
        templates.response["result"]["resourceTemplates"][0]["uriTemplate"],
        "data://users/{user_name}"
    );

    let write = client
        .call_tool("write_user", json!({"name": "Alice", "email": "alice@x.com"}))
        .await;
    assert_eq!(write.response["result"]["isError"], false);
    assert_eq!(write.response["result"]["structuredContent"]["total_users"], 1);

    let count = client.call_tool("get_user_count", json!({})).await;
    assert_eq!(count.response["result"]["content"][0]["text"], "1");

    let prompt = client
        .request(
            "prompts/get",
            json!({"name": "data_analysis_prompt", "arguments": {"analysis_type": "quality"}}),
        )
        .await;
    let result = &prompt.response["result"];
    assert_eq!(result["description"], "Template for analyzing user data");
    let text = result["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.starts_with("Please perform a quality analysis"));
    assert!(text.contains("1 users with domains: [x.com]"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn tool_progress_is_streamed_for_a_progress_token() {
    let (_dir, service) = temp_service().await;
    let (mut client, _) = ScriptedClient::connect(UserDataMcpServer::new(service), json!({})).await;

    let exchange = client
        .request(
            "tools/call",
            json!({
                "name": "bulk_add_users",
                "arguments": {"users_data": [
                    {"name": "A", "email": "a@z.com"},
                    {"name": "B", "email": "b@z.com"}
                ]},
                "_meta": {"progressToken": "tok"}
            }),
        )
        .await;

    assert_eq!(exchange.response["result"]["isError"], false);
    assert_eq!(exchange.response["result"]["structuredContent"]["successful"], 2);

    let progress: Vec<(f64, f64)> = exchange
        .notifications("notifications/progress")
        .iter()
        .map(|n| {
            assert_eq!(n["params"]["progressToken"], "tok");
            (
                n["params"]["progress"].as_f64().unwrap(),
                n["params"]["total"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(progress, vec![(0.0, 2.0), (1.0, 2.0), (2.0, 2.0)]);
    assert!(
        exchange
            .notifications("notifications/message")
            .iter()
            .any(|n| n["params"]["data"] == "All users saved to storage"
                && n["params"]["level"] == "info")
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn resource_reads_send_messages_but_no_progress_without_token() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &json!({"users": fixtures::alice_and_bob()}));
    let server = UserDataMcpServer::new(service_in(dir.path()).await);
    let (mut client, _) = ScriptedClient::connect(server, json!({})).await;

    let exchange = client
        .request("resources/read", json!({"uri": "data://users/stats"}))
        .await;

    assert!(exchange.notifications("notifications/progress").is_empty());
    assert!(!exchange.notifications("notifications/message").is_empty());
    let contents = &exchange.response["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "application/json");
    let payload: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["stats"]["total"], 2);

    let unknown = client
        .request("resources/read", json!({"uri": "data://nowhere"}))
        .await;
    assert_eq!(unknown.response["error"]["code"], -32602);
    assert_eq!(unknown.response["error"]["data"]["error_code"], "INVALID_REQUEST");

    client.close().await.unwrap();
}

#[tokio::test]
async fn analysis_asks_a_sampling_client_for_insights() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &json!({"users": fixtures::alice_and_bob()}));
    let server = UserDataMcpServer::new(service_in(dir.path()).await);
    let (mut client, _) = ScriptedClient::connect(server, json!({"sampling": {}})).await;
    client.answer_sampling_with("Grow beyond x.com and y.com");

    let exchange = client.call_tool("analyze_users", json!({})).await;

    let insights = exchange.response["result"]["structuredContent"]["insights"]
        .as_array()
        .unwrap();
    let tail: Vec<&str> = insights[insights.len() - 2..]
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(tail, ["AI-Powered Strategic Insights:", "Grow beyond x.com and y.com"]);

    let requests = client.sampling_requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0]["params"];
    assert_eq!(params["temperature"].as_f64(), Some(0.3));
    let prompt = params["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(prompt.starts_with("Analyze this user data"));
    assert!(prompt.contains("Total users: 2"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn analysis_without_sampling_uses_the_fallback_line() {
    let (dir, _) = temp_service().await;
    write_users_document(dir.path(), &json!({"users": fixtures::alice_and_bob()}));
    let server = UserDataMcpServer::new(service_in(dir.path()).await);
    let (mut client, _) = ScriptedClient::connect(server, json!({})).await;

    let exchange = client.call_tool("analyze_users", json!({})).await;

    assert!(client.sampling_requests().is_empty());
    let insights = exchange.response["result"]["structuredContent"]["insights"]
        .as_array()
        .unwrap();
    assert_eq!(
        insights.last().and_then(Value::as_str),
        Some("AI insights not available in this environment")
    );
    assert!(
        exchange
            .notifications("notifications/message")
            .iter()
            .any(|n| n["params"]["level"] == "warning")
    );

    client.close().await.unwrap();
}
