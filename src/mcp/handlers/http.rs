//! HTTP invoker for tools generated from API operations.
//!
//! Builds `base_url + resolved_path [+ ?query]`, sends the request with the
//! operation's verb, and turns whatever comes back (including transport
//! failures) into an `InvocationResult`. Nothing here returns `Err`: every
//! failure is reported as error text for the caller.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::InvocationResult;
use crate::openapi::router::{route, value_to_param_string};
use crate::openapi::{HttpMethod, OperationSpec};
use crate::mcp::tools::CallArguments;

// ============================================
// URL assembly
// ============================================

/// Join base URL, path and optional query string.
///
/// Exactly one trailing slash is dropped from the base, the path gets a
/// leading slash if missing, and the query is form-urlencoded. Array values
/// become repeated keys.
pub fn build_url(base_url: &str, resolved_path: &str, query: &Map<String, Value>) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let mut url = if resolved_path.starts_with('/') {
        format!("{}{}", base, resolved_path)
    } else {
        format!("{}/{}", base, resolved_path)
    };

    if !query.is_empty() {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            match value {
                Value::Array(items) => {
                    for item in items {
                        serializer.append_pair(key, &value_to_param_string(item));
                    }
                }
                other => {
                    serializer.append_pair(key, &value_to_param_string(other));
                }
            }
        }
        url.push('?');
        url.push_str(&serializer.finish());
    }

    url
}

// ============================================
// Response normalization
// ============================================

/// Classify a response by status and body shape.
pub fn format_response(status: u16, body: &str) -> InvocationResult {
    if !(200..300).contains(&status) {
        return InvocationResult::Error(format!("Error {}: {}", status, body.trim()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let pretty = serde_json::to_string_pretty(&map).unwrap_or_else(|_| body.to_string());
            InvocationResult::Success(format!("Success:\n{}", pretty))
        }
        Ok(Value::Array(items)) => {
            let pretty = serde_json::to_string_pretty(&items).unwrap_or_else(|_| body.to_string());
            InvocationResult::Success(format!("Retrieved records: {}\n{}", items.len(), pretty))
        }
        Ok(scalar) => {
            InvocationResult::Success(format!("Result: {}", value_to_param_string(&scalar)))
        }
        Err(_) => InvocationResult::Success(format!("Result: {}", body)),
    }
}

fn transport_error(e: &reqwest::Error) -> String {
    let reason = if e.is_connect() {
        format!("cannot connect to target API ({})", e)
    } else if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    format!("Error calling API: {}", reason)
}

// ============================================
// HTTP client
// ============================================

/// Shared HTTP client for all generated tools.
#[derive(Debug, Clone, Default)]
pub struct HttpInvoker {
    client: reqwest::Client,
}

impl HttpInvoker {
    /// Create an invoker. `timeout` of `None` means requests may block
    /// indefinitely on a slow target.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Issue one request and normalize the outcome.
    pub async fn invoke(
        &self,
        method: HttpMethod,
        base_url: &str,
        resolved_path: &str,
        query: &Map<String, Value>,
        body: &Map<String, Value>,
    ) -> InvocationResult {
        let url = build_url(base_url, resolved_path, query);
        debug!(%method, %url, "Calling target API");

        let mut request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
            HttpMethod::Patch => self.client.patch(&url),
        };

        if method.sends_body() && !body.is_empty() {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, "API call failed: {}", e);
                return InvocationResult::Error(transport_error(&e));
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(text) => format_response(status, &text),
            Err(e) => InvocationResult::Error(format!(
                "Error calling API: failed to read response: {}",
                e
            )),
        }
    }
}

/// Invoker bound to one operation and the target API's base URL.
#[derive(Debug, Clone)]
pub struct HttpOperationInvoker {
    operation: OperationSpec,
    base_url: String,
    http: Arc<HttpInvoker>,
}

impl HttpOperationInvoker {
    pub fn new(
        operation: OperationSpec,
        base_url: impl Into<String>,
        http: Arc<HttpInvoker>,
    ) -> Self {
        Self {
            operation,
            base_url: base_url.into(),
            http,
        }
    }

    pub async fn invoke(&self, arguments: &CallArguments) -> InvocationResult {
        let routed = route(arguments, &self.operation);
        self.http
            .invoke(
                self.operation.method,
                &self.base_url,
                &routed.resolved_path,
                &routed.query,
                &routed.body,
            )
            .await
    }
}
