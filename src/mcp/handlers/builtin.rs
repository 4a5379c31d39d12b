//! Statically coded tools, registered alongside the generated ones when
//! `--builtins` is set.
//!
//! - `get_current_time` -- local time as `YYYY-MM-DD HH:MM:SS`
//! - `calculate`        -- arithmetic via `calculator::evaluate`

use serde_json::json;

use super::calculator::{evaluate, format_number};
use super::InvocationResult;
use crate::mcp::tools::{
    CallArguments, ToolDescriptor, ToolInvoker, ToolRegistry, ToolRegistryEntry,
};

fn handle_get_current_time(_args: &CallArguments) -> InvocationResult {
    InvocationResult::Success(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

fn handle_calculate(args: &CallArguments) -> InvocationResult {
    let Some(expression) = args.get("expression").and_then(|v| v.as_str()) else {
        return InvocationResult::Error("Error: expression is required".into());
    };
    match evaluate(expression) {
        Ok(value) => InvocationResult::Success(format!("Result: {}", format_number(value))),
        Err(e) => InvocationResult::Error(format!("Error: {}", e)),
    }
}

/// Registry entries for all builtin tools.
pub fn builtin_tools() -> Vec<ToolRegistryEntry> {
    vec![
        ToolRegistryEntry::new(
            ToolDescriptor {
                name: "get_current_time".into(),
                description: "Returns current time".into(),
                input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
            },
            ToolInvoker::function(handle_get_current_time),
        ),
        ToolRegistryEntry::new(
            ToolDescriptor {
                name: "calculate".into(),
                description: "Performs mathematical calculations (+ - * / % ^ and parentheses)"
                    .into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "expression": {
                            "type": "string",
                            "description": "Mathematical expression"
                        }
                    },
                    "required": ["expression"]
                }),
            },
            ToolInvoker::function(handle_calculate),
        ),
    ]
}

/// Add the builtin tools to a registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    for entry in builtin_tools() {
        registry.register(entry);
    }
}
