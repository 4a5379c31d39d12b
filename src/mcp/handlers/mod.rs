//! MCP tool handler implementations.
//!
//! - `http`       -- generated tools that call an operation of the target REST API
//! - `builtin`    -- statically coded tools (get_current_time, calculate)
//! - `calculator` -- arithmetic expression evaluator behind `calculate`

pub mod builtin;
pub mod calculator;
pub mod http;

use serde::{Deserialize, Serialize};

/// Outcome of one tool invocation: success text or error text, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    Error(String),
}

impl InvocationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }
}

/// Result payload of `tools/call`.
///
/// Matches the MCP protocol's tool result format:
/// ```json
/// {
///   "content": [{ "type": "text", "text": "..." }]
/// }
/// ```
/// `isError: true` is added only for failed invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolResult {
    /// Content items.
    pub content: Vec<McpContent>,
    /// Whether this result represents an error.
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content item in an MCP tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum McpContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl McpToolResult {
    /// Create a successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Create an error text result.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::Text { text: text.into() }],
            is_error: true,
        }
    }
}

impl From<InvocationResult> for McpToolResult {
    fn from(result: InvocationResult) -> Self {
        match result {
            InvocationResult::Success(text) => Self::text(text),
            InvocationResult::Error(text) => Self::error(text),
        }
    }
}
