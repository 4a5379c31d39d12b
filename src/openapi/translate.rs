//! Schema translator: API description -> tool descriptors.
//!
//! Each `paths.<path>.<method>` operation becomes one tool. Names come from
//! `operationId` when present, otherwise they are derived from the method
//! and path. Parameters are flattened into a single JSON-schema object.
//!
//! Known limitation: only the first level of a body schema is flattened.
//! Nested objects show up as a property of type `object` with no inner
//! schema, and `$ref` schemas are not resolved.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::load::load_description;
use super::{HttpMethod, OperationSpec, ParamLocation, ParameterSpec};
use crate::mcp::handlers::http::{HttpInvoker, HttpOperationInvoker};
use crate::mcp::tools::{ToolDescriptor, ToolInvoker, ToolRegistry, ToolRegistryEntry};

static API_VERSION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/v\d+/").expect("valid regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// Operation object as it appears in the description. Parameters stay raw
/// so one malformed entry does not sink the whole operation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOperation {
    #[serde(default)]
    operation_id: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Vec<Value>,
    #[serde(default)]
    request_body: Option<Value>,
}

/// One translated operation: what the client sees plus what the invoker needs.
#[derive(Debug, Clone)]
pub struct TranslatedOperation {
    pub descriptor: ToolDescriptor,
    pub operation: OperationSpec,
}

/// Derive the tool name for an operation.
///
/// `operationId` wins verbatim. Otherwise: strip a leading `/api/v<N>/`,
/// drop braces, turn `/` and any other non-word character into `_`, and
/// prefix with the lowercase method.
pub fn derive_tool_name(method: HttpMethod, path: &str, operation_id: Option<&str>) -> String {
    if let Some(id) = operation_id {
        return id.to_string();
    }
    let stripped = API_VERSION_PREFIX.replace(path, "");
    let cleaned = stripped.replace(['{', '}'], "").replace('/', "_");
    let cleaned = NON_WORD.replace_all(&cleaned, "_");
    format!("{}_{}", method.key(), cleaned)
}

/// Summary, else description, else `"<METHOD> <path>"`.
fn derive_description(method: HttpMethod, path: &str, op: &RawOperation) -> String {
    op.summary
        .clone()
        .or_else(|| op.description.clone())
        .unwrap_or_else(|| format!("{} {}", method, path))
}

/// JSON-schema property for a type/description/enum triple.
fn property_schema(
    param_type: Option<&str>,
    description: Option<&str>,
    enum_values: Option<&Value>,
) -> Value {
    let mut prop = Map::new();
    prop.insert("type".into(), json!(param_type.unwrap_or("string")));
    prop.insert("description".into(), json!(description.unwrap_or("")));
    if let Some(values) = enum_values {
        prop.insert("enum".into(), values.clone());
    }
    Value::Object(prop)
}

fn push_required(required: &mut Vec<String>, name: &str) {
    if !required.iter().any(|r| r == name) {
        required.push(name.to_string());
    }
}

/// Merge the first-level `properties` of a body schema into `properties`.
fn flatten_body_schema(
    schema: &Value,
    properties: &mut Map<String, Value>,
    required: &mut Vec<String>,
) {
    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, prop) in props {
            properties.insert(
                name.clone(),
                property_schema(
                    prop.get("type").and_then(|t| t.as_str()),
                    prop.get("description").and_then(|d| d.as_str()),
                    prop.get("enum"),
                ),
            );
        }
    }
    if let Some(names) = schema.get("required").and_then(|r| r.as_array()) {
        for name in names.iter().filter_map(|n| n.as_str()) {
            push_required(required, name);
        }
    }
}

/// Build the `inputSchema` object for a set of parameters plus an optional
/// body model.
pub fn build_input_schema(parameters: &[ParameterSpec], body_schema: Option<&Value>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in parameters {
        properties.insert(
            param.name.clone(),
            property_schema(
                param.declared_type(),
                param.description.as_deref(),
                param.declared_enum(),
            ),
        );
        if param.required {
            push_required(&mut required, &param.name);
        }
    }

    if let Some(schema) = body_schema {
        flatten_body_schema(schema, &mut properties, &mut required);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Body model for an operation: the first `in: body` parameter's schema,
/// else the OpenAPI 3 `requestBody` JSON schema.
fn body_schema(parameters: &[ParameterSpec], request_body: Option<&Value>) -> Option<Value> {
    if let Some(param) = parameters.iter().find(|p| p.location == ParamLocation::Body) {
        return param.schema.clone();
    }
    request_body?
        .get("content")?
        .get("application/json")?
        .get("schema")
        .cloned()
}

fn parse_parameters(raw: Vec<Value>, method: HttpMethod, path: &str) -> Vec<ParameterSpec> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<ParameterSpec>(value) {
            Ok(param) => Some(param),
            Err(e) => {
                warn!(%method, path, "Skipping unreadable parameter: {}", e);
                None
            }
        })
        .collect()
}

/// Translate one operation object.
fn translate_operation(
    method: HttpMethod,
    path: &str,
    value: &Value,
) -> Option<TranslatedOperation> {
    let raw: RawOperation = match serde_json::from_value(value.clone()) {
        Ok(op) => op,
        Err(e) => {
            warn!(%method, path, "Skipping unreadable operation: {}", e);
            return None;
        }
    };

    let name = derive_tool_name(method, path, raw.operation_id.as_deref());
    let description = derive_description(method, path, &raw);
    let parameters = parse_parameters(raw.parameters, method, path);
    let request_body_schema = body_schema(&parameters, raw.request_body.as_ref());
    let input_schema = build_input_schema(&parameters, request_body_schema.as_ref());

    Some(TranslatedOperation {
        descriptor: ToolDescriptor {
            name,
            description,
            input_schema,
        },
        operation: OperationSpec {
            method,
            path_template: path.to_string(),
            parameters,
            request_body_schema,
        },
    })
}

/// Walk `paths` in document order and translate every supported operation.
pub fn translate(description: &Value) -> Vec<TranslatedOperation> {
    let Some(paths) = description.get("paths").and_then(|p| p.as_object()) else {
        warn!("API description has no `paths` object");
        return Vec::new();
    };

    let mut translated = Vec::new();
    for (path, methods) in paths {
        let Some(methods) = methods.as_object() else {
            continue;
        };
        for (key, op) in methods {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            if let Some(t) = translate_operation(method, path, op) {
                translated.push(t);
            }
        }
    }
    translated
}

/// Build a registry of HTTP tools from a parsed description, sharing one
/// HTTP invoker across all of them.
pub fn build_registry_with(
    description: &Value,
    base_url: &str,
    http: Arc<HttpInvoker>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for t in translate(description) {
        let invoker = HttpOperationInvoker::new(t.operation, base_url, Arc::clone(&http));
        registry.register(ToolRegistryEntry::new(t.descriptor, ToolInvoker::Http(invoker)));
    }
    info!("Created {} MCP tools from API description", registry.len());
    registry
}

/// Build a registry of HTTP tools with a default HTTP invoker (no timeout).
pub fn build_registry(description: &Value, base_url: &str) -> ToolRegistry {
    build_registry_with(description, base_url, Arc::new(HttpInvoker::default()))
}

/// Load a description and build its registry. Load failures are logged and
/// yield an empty registry instead of an error.
pub async fn load_registry(source: &str, base_url: &str, http: Arc<HttpInvoker>) -> ToolRegistry {
    match load_description(http.client(), source).await {
        Ok(doc) => build_registry_with(&doc, base_url, http),
        Err(e) => {
            warn!(source, "Error loading API description: {}", e);
            ToolRegistry::new()
        }
    }
}
