//! Parameter router: splits tool-call arguments into path, query and body.
//!
//! Anything that is neither a path placeholder nor a declared `query`
//! parameter lands in the body, including arguments the operation never
//! declared. Unknown arguments are passed through, not rejected.

use serde_json::{Map, Value};

use super::{OperationSpec, ParamLocation};

/// Arguments split by destination, plus the path with placeholders filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedParams {
    pub resolved_path: String,
    pub path: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Map<String, Value>,
}

/// String form of an argument for path substitution and query strings:
/// strings as-is, null as empty, everything else as compact JSON.
pub fn value_to_param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Route call arguments against an operation.
///
/// Path values are substituted verbatim (no percent-encoding).
pub fn route(arguments: &Map<String, Value>, operation: &OperationSpec) -> RoutedParams {
    let mut routed = RoutedParams {
        resolved_path: operation.path_template.clone(),
        ..Default::default()
    };

    for (key, value) in arguments {
        let placeholder = format!("{{{}}}", key);
        if operation.path_template.contains(&placeholder) {
            routed.resolved_path = routed
                .resolved_path
                .replace(&placeholder, &value_to_param_string(value));
            routed.path.insert(key.clone(), value.clone());
            continue;
        }

        let is_query = operation
            .parameter(key)
            .is_some_and(|p| p.location == ParamLocation::Query);
        if is_query {
            routed.query.insert(key.clone(), value.clone());
        } else {
            routed.body.insert(key.clone(), value.clone());
        }
    }

    routed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{HttpMethod, ParameterSpec};
    use serde_json::json;

    fn param(name: &str, location: &str) -> ParameterSpec {
        serde_json::from_value(json!({ "name": name, "in": location })).unwrap()
    }

    fn op(path: &str, parameters: Vec<ParameterSpec>) -> OperationSpec {
        OperationSpec {
            method: HttpMethod::Post,
            path_template: path.to_string(),
            parameters,
            request_body_schema: None,
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_path_substitution() {
        let operation = op(
            "/users/{id}/posts/{postId}",
            vec![param("id", "path"), param("postId", "path")],
        );
        let routed = route(&args(json!({"id": "7", "postId": "3"})), &operation);
        assert_eq!(routed.resolved_path, "/users/7/posts/3");
        assert_eq!(routed.path.len(), 2);
        assert!(routed.query.is_empty());
        assert!(routed.body.is_empty());
    }

    #[test]
    fn test_path_substitution_without_declaration() {
        // placeholder match alone is enough, and numbers render bare
        let operation = op("/items/{id}", vec![]);
        let routed = route(&args(json!({"id": 42})), &operation);
        assert_eq!(routed.resolved_path, "/items/42");
        assert!(routed.body.is_empty());
    }

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        let operation = op("/a/{x}/b/{x}", vec![]);
        let routed = route(&args(json!({"x": "q"})), &operation);
        assert_eq!(routed.resolved_path, "/a/q/b/q");
    }

    #[test]
    fn test_query_vs_body() {
        let operation = op("/search", vec![param("term", "query"), param("payload", "body")]);
        let arguments = args(json!({"term": "rust", "payload": {"a": 1}, "extra": true}));
        let routed = route(&arguments, &operation);
        assert_eq!(routed.query.get("term"), Some(&json!("rust")));
        assert!(routed.body.get("term").is_none());
        assert_eq!(routed.body.get("payload"), Some(&json!({"a": 1})));
        assert_eq!(routed.body.get("extra"), Some(&json!(true)));
    }

    #[test]
    fn test_header_param_defaults_to_body() {
        let operation = op("/x", vec![param("X-Trace", "header")]);
        let routed = route(&args(json!({"X-Trace": "abc"})), &operation);
        assert_eq!(routed.body.get("X-Trace"), Some(&json!("abc")));
    }

    #[test]
    fn test_unresolved_placeholder_left_in_place() {
        let operation = op("/users/{id}", vec![param("id", "path")]);
        let routed = route(&Map::new(), &operation);
        assert_eq!(routed.resolved_path, "/users/{id}");
    }

    #[test]
    fn test_value_to_param_string() {
        assert_eq!(value_to_param_string(&json!("a b")), "a b");
        assert_eq!(value_to_param_string(&json!(1.5)), "1.5");
        assert_eq!(value_to_param_string(&json!(false)), "false");
        assert_eq!(value_to_param_string(&Value::Null), "");
        assert_eq!(value_to_param_string(&json!([1, 2])), "[1,2]");
    }
}
