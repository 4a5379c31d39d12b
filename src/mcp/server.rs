//! MCP JSON-RPC protocol handler over stdio.
//!
//! Reads JSON-RPC requests line by line, answers `initialize`, `tools/list`
//! and `tools/call`, and writes one response line per request. Each request
//! is fully handled before the next line is read.
//!
//! Errors are reported as a `result.error` string inside a normal envelope,
//! not as a JSON-RPC error object. Lines that are not a JSON object get no
//! response at all.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use super::handlers::McpToolResult;
use super::tools::{CallArguments, ToolRegistry};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// JSON-RPC message types
// ---------------------------------------------------------------------------

/// Incoming JSON-RPC request. Every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    method: Value,
    #[serde(default)]
    params: Value,
}

impl JsonRpcRequest {
    /// Method name as text. Non-string methods are rendered as compact JSON,
    /// a missing or null method as the empty string.
    fn method_name(&self) -> String {
        display_value(&self.method)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    result: Value,
}

impl JsonRpcResponse {
    fn new(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

fn error_result(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Why an input line produced no response.
#[derive(Debug)]
enum FramingError {
    Utf8(std::str::Utf8Error),
    Json(serde_json::Error),
    NotAnObject,
}

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8(e) => write!(f, "invalid UTF-8: {}", e),
            Self::Json(e) => write!(f, "invalid JSON: {}", e),
            Self::NotAnObject => f.write_str("request is not a JSON object"),
        }
    }
}

fn parse_request(line: &str) -> Result<JsonRpcRequest, FramingError> {
    let value: Value = serde_json::from_str(line).map_err(FramingError::Json)?;
    if !value.is_object() {
        return Err(FramingError::NotAnObject);
    }
    serde_json::from_value(value).map_err(FramingError::Json)
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

/// Stdio MCP server over a fixed tool registry.
#[derive(Debug, Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns an error only when reading the input fails.
    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = reader;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!("[MCP] Dropping request: {}", FramingError::Utf8(e));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            let request = match parse_request(line) {
                Ok(request) => request,
                Err(e) => {
                    warn!("[MCP] Dropping request: {}", e);
                    continue;
                }
            };
            info!("[MCP] Received: {}", request.method_name());

            // Run on its own task so a panicking tool only loses this request.
            let registry = Arc::clone(&self.registry);
            let id = request.id.clone();
            let handled =
                tokio::spawn(async move { handle_request(&registry, &request).await }).await;

            match handled {
                Ok(result) => write_response(writer, &JsonRpcResponse::new(id, result)).await,
                Err(e) => error!("[MCP] Request {} failed: {}", id, e),
            }
        }

        info!("[MCP] Input closed, shutting down");
        Ok(())
    }
}

/// Run the MCP server on stdin/stdout. Blocks until stdin closes.
pub async fn run_server(registry: ToolRegistry) -> std::io::Result<()> {
    let server = McpServer::new(registry);
    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();

    info!("[MCP] Swagger MCP gateway running with {} tools", server.registry().len());
    server.run(reader, &mut writer).await
}

/// Handle a single JSON-RPC request and return its `result` payload.
async fn handle_request(registry: &ToolRegistry, request: &JsonRpcRequest) -> Value {
    match request.method.as_str() {
        Some("initialize") => handle_initialize(),
        Some("tools/list") => handle_tools_list(registry),
        Some("tools/call") => handle_tools_call(registry, &request.params).await,
        _ => error_result(format!("Unknown method: {}", request.method_name())),
    }
}

/// Handle `initialize` -- return server capabilities.
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        },
        "capabilities": {
            "tools": {}
        }
    })
}

/// Handle `tools/list` -- descriptors only, in registration order.
fn handle_tools_list(registry: &ToolRegistry) -> Value {
    json!({ "tools": registry.list() })
}

/// Handle `tools/call` -- look up the tool and invoke it.
async fn handle_tools_call(registry: &ToolRegistry, params: &Value) -> Value {
    let tool_name = match params.get("name") {
        None | Some(Value::Null) => return error_result("Missing tool name in params"),
        Some(name) => display_value(name),
    };
    let args: CallArguments = params
        .get("arguments")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let Some(entry) = registry.get(&tool_name) else {
        return error_result(format!("Tool not found: {}", tool_name));
    };

    debug!("[MCP] Calling {} with {} arguments", tool_name, args.len());
    let result = McpToolResult::from(entry.invoker.invoke(&args).await);
    if result.is_error {
        warn!("[MCP] Tool {} returned an error", tool_name);
    }

    serde_json::to_value(&result)
        .unwrap_or_else(|e| error_result(format!("Failed to serialize result: {}", e)))
}

/// Write a JSON-RPC response (one line) and flush.
async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let line = format!("{}\n", json);
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                error!("[MCP] Failed to write response: {}", e);
            }
            if let Err(e) = writer.flush().await {
                error!("[MCP] Failed to flush stdout: {}", e);
            }
        }
        Err(e) => {
            error!("[MCP] Failed to serialize response: {}", e);
        }
    }
}
