//! Tool registry.
//!
//! Maps tool names to a descriptor (what `tools/list` shows) and an invoker
//! (what `tools/call` runs). Populated once at startup, then shared
//! read-only behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::handlers::http::HttpOperationInvoker;
use super::handlers::InvocationResult;

/// Arguments supplied to one tool call.
pub type CallArguments = Map<String, Value>;

/// Statically coded tool body.
pub type ToolFn = Arc<dyn Fn(&CallArguments) -> InvocationResult + Send + Sync>;

/// Tool metadata exposed via `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// How a tool is executed.
#[derive(Clone)]
pub enum ToolInvoker {
    /// Generated from an API operation; calls the target REST API.
    Http(HttpOperationInvoker),
    /// Plain function value.
    Function(ToolFn),
}

impl ToolInvoker {
    /// Wrap a closure as an invoker.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&CallArguments) -> InvocationResult + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    pub async fn invoke(&self, arguments: &CallArguments) -> InvocationResult {
        match self {
            Self::Http(op) => op.invoke(arguments).await,
            Self::Function(f) => f(arguments),
        }
    }
}

impl fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(op) => f.debug_tuple("Http").field(op).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// One registered tool.
#[derive(Debug, Clone)]
pub struct ToolRegistryEntry {
    pub descriptor: ToolDescriptor,
    pub invoker: ToolInvoker,
}

impl ToolRegistryEntry {
    pub fn new(descriptor: ToolDescriptor, invoker: ToolInvoker) -> Self {
        Self { descriptor, invoker }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Name -> tool mapping, listed in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolRegistryEntry>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A duplicate name replaces the earlier entry in place, so
    /// the listing keeps the first registration's position.
    pub fn register(&mut self, entry: ToolRegistryEntry) {
        match self.by_name.get(entry.name()) {
            Some(&idx) => {
                warn!("[MCP] Duplicate tool name \"{}\", later definition wins", entry.name());
                self.entries[idx] = entry;
            }
            None => {
                self.by_name.insert(entry.name().to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<&ToolDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolRegistryEntry> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
