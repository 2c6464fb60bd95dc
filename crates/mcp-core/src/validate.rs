//! Argument validation against a normalized input schema.
//!
//! Generated stubs validate their arguments before dispatching so that a
//! malformed call fails locally with [`Error::InvalidArguments`] instead of
//! round-tripping to the server.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::schema::normalize_input_schema;
//! use mcp_toolgen_core::validate::validate_arguments;
//! use serde_json::json;
//!
//! let schema = normalize_input_schema("search", &json!({
//!     "type": "object",
//!     "properties": {"query": {"type": "string"}},
//!     "required": ["query"]
//! })).unwrap();
//!
//! let ok = json!({"query": "rust"});
//! assert!(validate_arguments("search", &schema, ok.as_object().unwrap()).is_ok());
//!
//! let missing = json!({});
//! assert!(validate_arguments("search", &schema, missing.as_object().unwrap()).is_err());
//! ```

use crate::schema::{InputSchema, ParameterSpec, PrimitiveType, SchemaKind};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Validates a complete argument map for `tool`.
///
/// Required parameters must be present, and may be `null` only when their
/// schema is nullable. Optional parameters may be absent or `null`. Undeclared arguments are rejected only when the schema sets
/// `additionalProperties: false`.
///
/// # Errors
///
/// Returns `Error::InvalidArguments` describing the first failure found.
pub fn validate_arguments(
    tool: &str,
    schema: &InputSchema,
    arguments: &Map<String, Value>,
) -> Result<()> {
    let reason = check_fields(
        "",
        &schema.parameters,
        schema.additional_properties,
        arguments,
    );

    match reason {
        Some(reason) => Err(Error::InvalidArguments {
            tool: tool.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Returns `true` if `value` conforms to `kind`.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::schema::{PrimitiveType, SchemaKind};
/// use mcp_toolgen_core::validate::conforms;
/// use serde_json::json;
///
/// let kind = SchemaKind::Primitive { primitive: PrimitiveType::Integer };
/// assert!(conforms(&kind, &json!(3)));
/// assert!(!conforms(&kind, &json!("3")));
/// ```
#[must_use]
pub fn conforms(kind: &SchemaKind, value: &Value) -> bool {
    check_value("value", kind, value).is_none()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    prefix: &str,
    fields: &[ParameterSpec],
    additional_properties: bool,
    values: &Map<String, Value>,
) -> Option<String> {
    for field in fields {
        let path = join(prefix, &field.name);
        match values.get(&field.name) {
            None if field.required => {
                return Some(format!("missing required argument '{path}'"));
            }
            None => {}
            Some(Value::Null) if !field.required => {}
            Some(value) => {
                if let Some(reason) = check_value(&path, &field.kind, value) {
                    return Some(reason);
                }
            }
        }
    }

    if !additional_properties
        && let Some(unknown) = values
            .keys()
            .find(|key| !fields.iter().any(|f| &f.name == *key))
    {
        return Some(format!("unexpected argument '{}'", join(prefix, unknown)));
    }

    None
}

fn check_value(path: &str, kind: &SchemaKind, value: &Value) -> Option<String> {
    match kind {
        SchemaKind::Unknown => None,
        SchemaKind::Nullable { inner } => {
            if value.is_null() {
                None
            } else {
                check_value(path, inner, value)
            }
        }
        SchemaKind::Primitive { primitive } => {
            if matches_primitive(*primitive, value) {
                None
            } else {
                Some(format!(
                    "'{path}' must be of type {}, got {}",
                    primitive.as_str(),
                    describe(value)
                ))
            }
        }
        SchemaKind::Enum { values, .. } => {
            if values.contains(value) {
                None
            } else {
                Some(format!("'{path}' must be one of {}", Value::from(values.clone())))
            }
        }
        SchemaKind::Array { items } => {
            let Value::Array(elements) = value else {
                return Some(format!("'{path}' must be an array, got {}", describe(value)));
            };
            let items = items.as_deref()?;
            elements
                .iter()
                .enumerate()
                .find_map(|(i, element)| check_value(&format!("{path}[{i}]"), items, element))
        }
        SchemaKind::Object {
            fields,
            additional_properties,
        } => {
            let Value::Object(map) = value else {
                return Some(format!("'{path}' must be an object, got {}", describe(value)));
            };
            check_fields(path, fields, *additional_properties, map)
        }
    }
}

fn matches_primitive(primitive: PrimitiveType, value: &Value) -> bool {
    match primitive {
        PrimitiveType::String => value.is_string(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Null => value.is_null(),
        PrimitiveType::Number => value.is_number(),
        PrimitiveType::Integer => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract().abs() < f64::EPSILON)
            }
            _ => false,
        },
    }
}

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
