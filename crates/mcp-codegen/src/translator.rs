//! Type Translator: normalized parameter shapes to type annotations.
//!
//! A [`TypeAnnotation`] says what type a value should have, independent of
//! how that type is spelled in Rust; [`crate::rust_types`] does the
//! spelling. Schema nodes that cannot be typed become
//! [`TypeAnnotation::Any`] and are logged, never rejected.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_codegen::translator::{TypeAnnotation, translate};
//! use mcp_toolgen_core::schema::normalize_input_schema;
//! use serde_json::json;
//!
//! let schema = normalize_input_schema("search", &json!({
//!     "type": "object",
//!     "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
//! })).unwrap();
//!
//! let annotation = translate(&schema.parameters[0]);
//! assert_eq!(annotation, TypeAnnotation::Sequence {
//!     element: Box::new(TypeAnnotation::Scalar {
//!         primitive: mcp_toolgen_core::PrimitiveType::String,
//!     }),
//! });
//! ```

use mcp_toolgen_core::{InputSchema, ParameterSpec, PrimitiveType, SchemaKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Target-independent type of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "annotation", rename_all = "snake_case")]
pub enum TypeAnnotation {
    /// Scalar value.
    Scalar {
        /// Scalar type
        primitive: PrimitiveType,
    },
    /// Sequence of one element type.
    Sequence {
        /// Element type ([`TypeAnnotation::Any`] when unconstrained)
        element: Box<TypeAnnotation>,
    },
    /// Record with named fields.
    Record {
        /// Fields in schema order
        fields: Vec<FieldAnnotation>,
        /// Whether undeclared keys are accepted
        additional_properties: bool,
    },
    /// String-keyed mapping of arbitrary values.
    Mapping,
    /// One of a closed set of literal values.
    Literals {
        /// Shared scalar type of the literals, if any
        base: Option<PrimitiveType>,
        /// Allowed values
        values: Vec<Value>,
    },
    /// A value of the inner type, or `null`.
    Nullable {
        /// Type of the non-null values
        inner: Box<TypeAnnotation>,
    },
    /// Any JSON value.
    Any,
}

/// One field of a [`TypeAnnotation::Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    /// Name on the wire
    pub name: String,
    /// Field type
    pub annotation: TypeAnnotation,
    /// Whether the field must be present
    pub required: bool,
    /// Description from the schema
    pub description: Option<String>,
    /// Default from the schema
    pub default: Option<Value>,
}

/// Translates one parameter.
#[must_use]
pub fn translate(spec: &ParameterSpec) -> TypeAnnotation {
    translate_kind(&spec.kind, &spec.name)
}

/// Translates a whole input schema into a record annotation.
#[must_use]
pub fn translate_input(schema: &InputSchema) -> TypeAnnotation {
    TypeAnnotation::Record {
        fields: schema.parameters.iter().map(|p| field(p, &p.name)).collect(),
        additional_properties: schema.additional_properties,
    }
}

fn field(spec: &ParameterSpec, path: &str) -> FieldAnnotation {
    FieldAnnotation {
        name: spec.name.clone(),
        annotation: translate_kind(&spec.kind, path),
        required: spec.required,
        description: spec.description.clone(),
        default: spec.default.clone(),
    }
}

fn translate_kind(kind: &SchemaKind, path: &str) -> TypeAnnotation {
    match kind {
        SchemaKind::Primitive { primitive } => TypeAnnotation::Scalar {
            primitive: *primitive,
        },
        SchemaKind::Array { items } => TypeAnnotation::Sequence {
            element: Box::new(items.as_deref().map_or(TypeAnnotation::Any, |items| {
                translate_kind(items, &format!("{path}[]"))
            })),
        },
        SchemaKind::Object { fields, .. } if fields.is_empty() => TypeAnnotation::Mapping,
        SchemaKind::Object {
            fields,
            additional_properties,
        } => TypeAnnotation::Record {
            fields: fields
                .iter()
                .map(|f| field(f, &format!("{path}.{}", f.name)))
                .collect(),
            additional_properties: *additional_properties,
        },
        SchemaKind::Enum { base, values } => TypeAnnotation::Literals {
            base: *base,
            values: values.clone(),
        },
        SchemaKind::Nullable { inner } => TypeAnnotation::Nullable {
            inner: Box::new(translate_kind(inner, path)),
        },
        SchemaKind::Unknown => {
            tracing::warn!("No concrete type for '{}', falling back to an untyped value", path);
            TypeAnnotation::Any
        }
    }
}

impl TypeAnnotation {
    /// Returns `true` if this annotation or any nested one is [`TypeAnnotation::Any`].
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        match self {
            Self::Any => true,
            Self::Sequence { element } => element.is_degraded(),
            Self::Nullable { inner } => inner.is_degraded(),
            Self::Record { fields, .. } => fields.iter().any(|f| f.annotation.is_degraded()),
            Self::Scalar { .. } | Self::Mapping | Self::Literals { .. } => false,
        }
    }

    /// Returns the type of the non-null values.
    #[must_use]
    pub fn non_null(&self) -> &Self {
        match self {
            Self::Nullable { inner } => inner,
            other => other,
        }
    }

    /// Returns the literals when this is a string enum usable as a closed
    /// Rust `enum`.
    #[must_use]
    pub fn string_literals(&self) -> Option<Vec<&str>> {
        match self {
            Self::Literals { values, .. } if !values.is_empty() => {
                values.iter().map(Value::as_str).collect()
            }
            _ => None,
        }
    }

    /// Converts the annotation back into a JSON schema.
    ///
    /// The result accepts at least every value the annotation describes,
    /// and still requires required record fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_codegen::translator::TypeAnnotation;
    /// use mcp_toolgen_core::PrimitiveType;
    /// use serde_json::json;
    ///
    /// let list = TypeAnnotation::Sequence {
    ///     element: Box::new(TypeAnnotation::Scalar { primitive: PrimitiveType::Integer }),
    /// };
    /// assert_eq!(list.to_json_schema(), json!({"type": "array", "items": {"type": "integer"}}));
    /// ```
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Scalar { primitive } => json!({ "type": primitive.as_str() }),
            Self::Sequence { element } => json!({
                "type": "array",
                "items": element.to_json_schema(),
            }),
            Self::Record {
                fields,
                additional_properties,
            } => {
                let mut properties = Map::new();
                for f in fields {
                    properties.insert(f.name.clone(), f.annotation.to_json_schema());
                }
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name.as_str())
                    .collect();

                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": additional_properties,
                })
            }
            Self::Mapping => json!({ "type": "object" }),
            Self::Literals { base, values } => {
                let mut schema = Map::new();
                if let Some(base) = base {
                    schema.insert("type".to_string(), json!(base.as_str()));
                }
                schema.insert("enum".to_string(), Value::Array(values.clone()));
                Value::Object(schema)
            }
            Self::Nullable { inner } => {
                let mut schema = inner.to_json_schema();
                if let Value::Object(map) = &mut schema
                    && !map.contains_key("enum")
                    && let Some(Value::String(keyword)) = map.get("type")
                {
                    let types = json!([keyword, "null"]);
                    map.insert("type".to_string(), types);
                    return schema;
                }
                json!({ "anyOf": [schema, { "type": "null" }] })
            }
            Self::Any => json!({}),
        }
    }
}

/// Formats the allowed values of a literal set for documentation.
#[must_use]
pub fn describe_literals(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| format!("`{v}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
