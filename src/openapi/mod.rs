//! OpenAPI/Swagger description handling.
//!
//! - `load.rs`      -- read the description from a file or URL
//! - `translate.rs` -- turn each HTTP operation into a tool descriptor
//! - `router.rs`    -- split call arguments into path / query / body buckets

pub mod load;
pub mod router;
pub mod translate;

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// HTTP methods
// ---------------------------------------------------------------------------

/// HTTP verbs that become tools. Any other key under a path is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Parse the lowercase method key used under `paths.<path>`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    /// Lowercase form, used as the tool-name prefix.
    pub fn key(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Whether requests with this verb carry a JSON body.
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Where a declared parameter lives (`in` in the description).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    Path,
    Query,
    Body,
    Header,
    Cookie,
    FormData,
    #[serde(other)]
    Other,
}

/// One declared operation parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in", default = "default_location")]
    pub location: ParamLocation,
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Value>,
    /// Nested schema: the body model for `in: body`, or the value schema
    /// for OpenAPI 3 style parameters.
    #[serde(default)]
    pub schema: Option<Value>,
}

fn default_location() -> ParamLocation {
    ParamLocation::Other
}

impl ParameterSpec {
    /// Declared type, falling back to `schema.type`.
    pub fn declared_type(&self) -> Option<&str> {
        self.param_type
            .as_deref()
            .or_else(|| self.schema.as_ref()?.get("type")?.as_str())
    }

    /// Declared enum, falling back to `schema.enum`.
    pub fn declared_enum(&self) -> Option<&Value> {
        self.enum_values
            .as_ref()
            .or_else(|| self.schema.as_ref()?.get("enum"))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Source of truth for one HTTP operation. Immutable once translated.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    pub method: HttpMethod,
    pub path_template: String,
    pub parameters: Vec<ParameterSpec>,
    /// First-level body model (`in: body` schema or OpenAPI 3 `requestBody`).
    pub request_body_schema: Option<Value>,
}

impl OperationSpec {
    /// First declared parameter with the given name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_keys() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("GET"), None);
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::from_key("options"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_sends_body() {
        assert!(HttpMethod::Post.sends_body());
        assert!(HttpMethod::Put.sends_body());
        assert!(HttpMethod::Patch.sends_body());
        assert!(!HttpMethod::Get.sends_body());
        assert!(!HttpMethod::Delete.sends_body());
    }

    #[test]
    fn test_parameter_deserialize_swagger2() {
        let p: ParameterSpec = serde_json::from_value(json!({
            "name": "status",
            "in": "query",
            "type": "string",
            "required": true,
            "enum": ["open", "closed"]
        }))
        .unwrap();
        assert_eq!(p.location, ParamLocation::Query);
        assert_eq!(p.declared_type(), Some("string"));
        assert_eq!(p.declared_enum(), Some(&json!(["open", "closed"])));
        assert!(p.required);
    }

    #[test]
    fn test_parameter_deserialize_openapi3() {
        let p: ParameterSpec = serde_json::from_value(json!({
            "name": "limit",
            "in": "query",
            "schema": { "type": "integer", "enum": [10, 20] }
        }))
        .unwrap();
        assert_eq!(p.declared_type(), Some("integer"));
        assert_eq!(p.declared_enum(), Some(&json!([10, 20])));
        assert!(!p.required);
    }

    #[test]
    fn test_unknown_location_is_other() {
        let p: ParameterSpec =
            serde_json::from_value(json!({ "name": "x", "in": "matrix" })).unwrap();
        assert_eq!(p.location, ParamLocation::Other);
        let p: ParameterSpec = serde_json::from_value(json!({ "name": "y" })).unwrap();
        assert_eq!(p.location, ParamLocation::Other);
    }
}
