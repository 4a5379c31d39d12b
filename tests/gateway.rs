//! End-to-end: API description -> registry -> stdio loop -> target API.

use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use swagger_mcp_lib::mcp::server::McpServer;
use swagger_mcp_lib::openapi::translate::build_registry;

async fn get_post(
    Path((id, post_id)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    Json(json!({"user": id, "post": post_id, "query": query}))
}

async fn spawn_target() -> String {
    let app = Router::new()
        .route("/api/v1/users/:id/posts/:post_id", get(get_post))
        .route(
            "/api/v1/users",
            get(|| async { Json(json!([{"id": 1}, {"id": 2}])) })
                .post(|body: String| async move {
                    (StatusCode::CREATED, Json(json!({"received": body})))
                }),
        )
        .route("/api/v1/gone", get(|| async { (StatusCode::NOT_FOUND, "gone") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn description() -> Value {
    json!({
        "swagger": "2.0",
        "paths": {
            "/api/v1/users/{id}/posts/{postId}": {
                "get": {
                    "summary": "Get one post",
                    "parameters": [
                        {"name": "id", "in": "path", "required": true},
                        {"name": "postId", "in": "path", "required": true},
                        {"name": "expand", "in": "query"}
                    ]
                }
            },
            "/api/v1/users": {
                "get": {"operationId": "listUsers"},
                "post": {
                    "operationId": "createUser",
                    "parameters": [{"name": "body", "in": "body", "schema": {
                        "required": ["email"],
                        "properties": {"email": {"type": "string"}}
                    }}]
                }
            },
            "/api/v1/gone": {"get": {}}
        }
    })
}

async fn exchange(server: &McpServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();
    server.run(input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[tokio::test]
async fn test_every_operation_listed_and_callable() {
    let base = spawn_target().await;
    let server = McpServer::new(build_registry(&description(), &base));

    let responses = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 0, "method": "tools/list"}),
            call(
                1,
                "get_users_id_posts_postId",
                json!({"id": "7", "postId": "3", "expand": "all"}),
            ),
            call(2, "listUsers", json!({})),
            call(3, "createUser", json!({"email": "a@b.c"})),
            call(4, "get_gone", json!({})),
        ],
    )
    .await;
    assert_eq!(responses.len(), 5);

    let tools = responses[0]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["get_users_id_posts_postId", "listUsers", "createUser", "get_gone"]);

    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Success:\n"), "{}", text);
    let body: Value = serde_json::from_str(text.trim_start_matches("Success:\n")).unwrap();
    assert_eq!(body, json!({"user": "7", "post": "3", "query": "expand=all"}));

    let text = responses[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Retrieved records: 2\n"));

    let text = responses[3]["result"]["content"][0]["text"].as_str().unwrap();
    let body: Value = serde_json::from_str(text.trim_start_matches("Success:\n")).unwrap();
    let sent: Value = serde_json::from_str(body["received"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({"email": "a@b.c"}));

    assert_eq!(responses[4]["result"]["isError"], true);
    assert_eq!(responses[4]["result"]["content"][0]["text"], "Error 404: gone");
}

#[tokio::test]
async fn test_unreachable_target_reports_error_text() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let server = McpServer::new(build_registry(&description(), &base));
    let responses = exchange(&server, &[call(9, "listUsers", json!({}))]).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 9);
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error calling API:"), "{}", text);
}
