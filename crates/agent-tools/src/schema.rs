//! JSON Schema helpers
//!
//! Builders for the small subset of JSON Schema used by tool input schemas,
//! plus the argument validation the registry runs before every invocation.

use serde_json::{Map, Value, json};

use crate::{ToolError, ToolResult};

/// Create a JSON Schema object type
///
/// With the workspace's `preserve_order` serde_json feature, properties keep
/// the order they are written in.
pub fn object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn typed(type_name: &str, description: Option<&str>) -> Value {
    match description {
        Some(d) => json!({"type": type_name, "description": d}),
        None => json!({"type": type_name}),
    }
}

/// Create a JSON Schema string type
pub fn string(description: Option<&str>) -> Value {
    typed("string", description)
}

/// Create a JSON Schema number type
pub fn number(description: Option<&str>) -> Value {
    typed("number", description)
}

/// Create a JSON Schema integer type
pub fn integer(description: Option<&str>) -> Value {
    typed("integer", description)
}

/// Create a JSON Schema boolean type
pub fn boolean(description: Option<&str>) -> Value {
    typed("boolean", description)
}

/// Attach a default value to a property schema
pub fn with_default(mut schema: Value, default: Value) -> Value {
    if let Some(map) = schema.as_object_mut() {
        map.insert("default".to_string(), default);
    }
    schema
}

/// Check a value against the `type` of a schema (no nested validation)
pub fn validate_basic(value: &Value, schema: &Value) -> bool {
    let Some(Value::String(schema_type)) = schema.get("type") else {
        return true;
    };

    match schema_type.as_str() {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// Validate tool arguments against an object schema
///
/// `null` is accepted as an empty argument object. Every name in `required`
/// must be present and every supplied property with a known schema must match
/// its type. Extra properties are left for the handler to ignore.
///
/// Returns the arguments as an object.
pub fn validate_arguments(arguments: Value, schema: &Value) -> ToolResult<Value> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => arguments,
        other => {
            return Err(ToolError::InvalidArguments(format!(
                "expected an object of named arguments, got {other}"
            )));
        }
    };

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if arguments.get(name).is_none_or(Value::is_null) {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required argument '{name}'"
                )));
            }
        }
    }

    if let Some(supplied) = arguments.as_object() {
        for (name, value) in supplied {
            if let Some(property) = properties.get(name) {
                if !validate_basic(value, property) {
                    let expected = property.get("type").and_then(Value::as_str).unwrap_or("?");
                    return Err(ToolError::InvalidArguments(format!(
                        "argument '{name}' must be of type {expected}, got {value}"
                    )));
                }
            }
        }
    }

    Ok(arguments)
}
