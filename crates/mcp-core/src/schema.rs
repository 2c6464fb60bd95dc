//! Schema normalization for MCP tool descriptors.
//!
//! MCP servers describe tool inputs with JSON-schema-like documents. This
//! module turns such a document into a resolved tree of [`ParameterSpec`]
//! values that later stages (naming, type translation, argument validation)
//! can work with without touching raw JSON again.
//!
//! Normalization is a pure transform. It rejects descriptors that cannot be
//! turned into a finite parameter tree and keeps every keyword it does not
//! use for type derivation as opaque metadata.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::schema::{normalize_tool, RawTool, SchemaKind, PrimitiveType};
//! use mcp_toolgen_core::ServerId;
//! use serde_json::json;
//!
//! let raw = RawTool {
//!     name: "get-document!".to_string(),
//!     description: Some("Fetch a document".to_string()),
//!     input_schema: json!({
//!         "type": "object",
//!         "properties": {"document_id": {"type": "string"}},
//!         "required": ["document_id"]
//!     }),
//! };
//!
//! let tool = normalize_tool(&ServerId::new("gdrive"), raw).unwrap();
//! assert_eq!(tool.qualified_name(), "gdrive.get-document!");
//! let param = &tool.input_schema.parameters[0];
//! assert!(param.required);
//! assert_eq!(param.kind, SchemaKind::Primitive { primitive: PrimitiveType::String });
//! ```

use crate::{Error, Result, ServerId, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum nesting depth accepted for a schema tree.
pub const MAX_SCHEMA_DEPTH: usize = 32;

/// Maximum number of schema nodes a single tool may expand to once every
/// `$ref` is inlined.
pub const MAX_SCHEMA_NODES: usize = 10_000;

/// Keywords consumed during type derivation. Anything else is metadata.
const TYPE_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "required",
    "additionalProperties",
    "items",
    "enum",
    "const",
    "default",
    "description",
    "$ref",
    "$defs",
    "definitions",
    "anyOf",
    "oneOf",
    "allOf",
];

/// Tool descriptor exactly as received from a server handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTool {
    /// Tool name reported by the server
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// JSON-schema-like input description
    pub input_schema: Value,
}

/// Scalar JSON-schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// `"string"`
    String,
    /// `"integer"`
    Integer,
    /// `"number"`
    Number,
    /// `"boolean"`
    Boolean,
    /// `"null"`
    Null,
}

impl PrimitiveType {
    /// Parses a JSON-schema `type` keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::schema::PrimitiveType;
    ///
    /// assert_eq!(PrimitiveType::from_keyword("integer"), Some(PrimitiveType::Integer));
    /// assert_eq!(PrimitiveType::from_keyword("date"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// Returns the JSON-schema keyword for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Infers the narrowest primitive type shared by a set of literals.
    fn of_literals(values: &[Value]) -> Option<Self> {
        let mut inferred: Option<Self> = None;
        for value in values {
            let current = match value {
                Value::String(_) => Self::String,
                Value::Bool(_) => Self::Boolean,
                Value::Null => Self::Null,
                Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
                Value::Number(_) => Self::Number,
                Value::Array(_) | Value::Object(_) => return None,
            };
            inferred = match (inferred, current) {
                (None, t) => Some(t),
                (Some(a), b) if a == b => Some(a),
                (Some(Self::Integer | Self::Number), Self::Integer | Self::Number) => {
                    Some(Self::Number)
                }
                _ => return None,
            };
        }
        inferred
    }
}

/// Resolved shape of one schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaKind {
    /// Scalar value.
    Primitive {
        /// Scalar type
        primitive: PrimitiveType,
    },
    /// Homogeneous sequence.
    Array {
        /// Element kind; `None` when the schema leaves items unconstrained
        items: Option<Box<SchemaKind>>,
    },
    /// Object with zero or more fixed fields.
    Object {
        /// Declared fields in document order
        fields: Vec<ParameterSpec>,
        /// Whether undeclared keys are accepted
        additional_properties: bool,
    },
    /// Closed set of literal values.
    Enum {
        /// Shared scalar type of the literals, if there is one
        base: Option<PrimitiveType>,
        /// Allowed values in document order
        values: Vec<Value>,
    },
    /// A concrete shape that also accepts `null`.
    Nullable {
        /// Shape of the non-null values
        inner: Box<SchemaKind>,
    },
    /// Anything the normalizer could not map to a concrete shape.
    Unknown,
}

impl SchemaKind {
    /// Marks `inner` as accepting `null`.
    ///
    /// Kinds that already accept `null` are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::schema::{PrimitiveType, SchemaKind};
    ///
    /// let text = SchemaKind::Primitive { primitive: PrimitiveType::String };
    /// let nullable = SchemaKind::nullable(text.clone());
    /// assert_eq!(nullable, SchemaKind::Nullable { inner: Box::new(text) });
    /// assert_eq!(SchemaKind::nullable(nullable.clone()), nullable);
    /// assert_eq!(SchemaKind::nullable(SchemaKind::Unknown), SchemaKind::Unknown);
    /// ```
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        match inner {
            Self::Nullable { .. }
            | Self::Unknown
            | Self::Primitive {
                primitive: PrimitiveType::Null,
            } => inner,
            other => Self::Nullable {
                inner: Box::new(other),
            },
        }
    }

    /// Returns `true` for objects without declared fields.
    #[must_use]
    pub fn is_free_form_object(&self) -> bool {
        matches!(self, Self::Object { fields, .. } if fields.is_empty())
    }
}

/// One named parameter (or nested object field) of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Name as it appears on the wire
    pub name: String,
    /// Resolved shape
    #[serde(flatten)]
    pub kind: SchemaKind,
    /// Whether the parameter is listed in `required`
    pub required: bool,
    /// Default value declared by the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Description declared by the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords not used for type derivation
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// Normalized top-level input schema of a tool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSchema {
    /// Top-level parameters in document order
    pub parameters: Vec<ParameterSpec>,
    /// Whether undeclared arguments are accepted
    pub additional_properties: bool,
    /// Top-level keywords not used for type derivation
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl InputSchema {
    /// Returns the parameter with the given wire name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Normalized, immutable description of one discovered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Server the tool was discovered on
    pub server_id: ServerId,
    /// Raw tool name used for dispatch
    pub name: ToolName,
    /// Human-readable description (empty when the server gave none)
    pub description: String,
    /// Resolved parameter tree
    pub input_schema: InputSchema,
    /// Original schema document, kept for embedding in generated code
    pub raw_input_schema: Value,
}

impl ToolDescriptor {
    /// Returns `"<server_id>.<tool name>"`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.server_id.qualify(&self.name)
    }

    /// Returns the required top-level parameters in document order.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.input_schema.parameters.iter().filter(|p| p.required)
    }
}

/// Normalizes a raw tool descriptor discovered on `server_id`.
///
/// # Errors
///
/// Returns `Error::SchemaError` if the name is blank or the input schema is
/// malformed, recursive, nested deeper than [`MAX_SCHEMA_DEPTH`] or expands
/// to more than [`MAX_SCHEMA_NODES`] nodes.
pub fn normalize_tool(server_id: &ServerId, raw: RawTool) -> Result<ToolDescriptor> {
    if raw.name.trim().is_empty() {
        return Err(Error::SchemaError {
            tool: raw.name,
            reason: "tool name is missing".to_string(),
        });
    }

    let input_schema = normalize_input_schema(&raw.name, &raw.input_schema)?;

    Ok(ToolDescriptor {
        server_id: server_id.clone(),
        name: ToolName::new(raw.name),
        description: raw.description.unwrap_or_default(),
        input_schema,
        raw_input_schema: raw.input_schema,
    })
}

/// Normalizes a tool's top-level input schema.
///
/// # Errors
///
/// Returns `Error::SchemaError` when the document is not an object schema
/// or contains a node that cannot be resolved. A top-level `$ref` or
/// single-branch combinator is followed to the object schema it names.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::schema::normalize_input_schema;
/// use serde_json::json;
///
/// let schema = normalize_input_schema("t", &json!({"type": "object"})).unwrap();
/// assert!(schema.parameters.is_empty());
///
/// assert!(normalize_input_schema("t", &json!({"type": "string"})).is_err());
/// ```
pub fn normalize_input_schema(tool: &str, schema: &Value) -> Result<InputSchema> {
    let mut normalizer = Normalizer {
        tool,
        root: schema,
        ref_stack: Vec::new(),
        nodes: 0,
    };
    normalizer.root_schema()
}

struct Normalizer<'a> {
    tool: &'a str,
    root: &'a Value,
    ref_stack: Vec<String>,
    nodes: usize,
}

impl<'a> Normalizer<'a> {
    fn error(&self, reason: impl Into<String>) -> Error {
        Error::SchemaError {
            tool: self.tool.to_string(),
            reason: reason.into(),
        }
    }

    fn root_schema(&mut self) -> Result<InputSchema> {
        let root = self
            .root
            .as_object()
            .ok_or_else(|| self.error("input schema must be a JSON object"))?;
        let node = self.root_object(root, 1)?;

        match node.get("type") {
            None => {}
            Some(Value::String(t)) if t == "object" => {}
            Some(other) => {
                return Err(self.error(format!(
                    "top-level schema type must be \"object\", found {other}"
                )));
            }
        }

        let mut top_metadata = metadata(node);
        for (key, value) in metadata(root) {
            top_metadata.entry(key).or_insert(value);
        }

        Ok(InputSchema {
            parameters: self.fields(node, 1)?,
            additional_properties: additional_properties(node),
            metadata: top_metadata,
        })
    }

    /// Follows a top-level `$ref` or single-branch combinator to the object
    /// schema that actually declares the parameters.
    fn root_object(
        &mut self,
        node: &'a Map<String, Value>,
        depth: usize,
    ) -> Result<&'a Map<String, Value>> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(self.error(format!(
                "schema nesting exceeds maximum depth of {MAX_SCHEMA_DEPTH}"
            )));
        }

        if node.contains_key("properties") {
            return Ok(node);
        }

        if let Some(reference) = node.get("$ref") {
            let (reference, target) = self.resolve(reference)?;
            // Root references stay on the stack so a property pointing back
            // at the root is reported as recursive.
            self.ref_stack.push(reference.to_string());
            return self.root_object(target, depth + 1);
        }

        for combinator in ["allOf", "anyOf", "oneOf"] {
            let Some(branches) = node.get(combinator) else {
                continue;
            };
            let branches = branches
                .as_array()
                .ok_or_else(|| self.error(format!("'{combinator}' must be an array")))?;
            let candidates: Vec<_> = branches
                .iter()
                .filter(|branch| !branch.as_object().is_some_and(is_null_schema))
                .collect();
            return match candidates.as_slice() {
                [Value::Object(single)] => self.root_object(single, depth + 1),
                _ => Err(self.error(format!(
                    "top-level '{combinator}' must have exactly one object branch"
                ))),
            };
        }

        Ok(node)
    }

    fn fields(&mut self, node: &'a Map<String, Value>, depth: usize) -> Result<Vec<ParameterSpec>> {
        let properties = match node.get("properties") {
            None => return Ok(Vec::new()),
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err(self.error("'properties' must be an object")),
        };

        let required = self.required_names(node)?;
        for name in &required {
            if !properties.contains_key(*name) {
                tracing::debug!(
                    "Tool '{}' lists unknown required property '{}'",
                    self.tool,
                    name
                );
            }
        }

        properties
            .iter()
            .map(|(name, schema)| self.parameter(name, schema, required.contains(&name.as_str()), depth))
            .collect()
    }

    fn required_names(&self, node: &'a Map<String, Value>) -> Result<Vec<&'a str>> {
        match node.get("required") {
            None => Ok(Vec::new()),
            Some(Value::Array(names)) => names
                .iter()
                .map(|n| {
                    n.as_str()
                        .ok_or_else(|| self.error("'required' must contain only strings"))
                })
                .collect(),
            Some(_) => Err(self.error("'required' must be an array")),
        }
    }

    fn parameter(
        &mut self,
        name: &str,
        schema: &'a Value,
        required: bool,
        depth: usize,
    ) -> Result<ParameterSpec> {
        match schema {
            // `true`/`false` schemas accept anything (or nothing); neither has a shape.
            Value::Bool(_) => Ok(ParameterSpec {
                name: name.to_string(),
                kind: SchemaKind::Unknown,
                required,
                default: None,
                description: None,
                metadata: Map::new(),
            }),
            Value::Object(node) => Ok(ParameterSpec {
                name: name.to_string(),
                kind: self.kind(node, depth)?,
                required,
                default: node.get("default").cloned(),
                description: node
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
                metadata: metadata(node),
            }),
            _ => Err(self.error(format!(
                "schema for property '{name}' must be an object or boolean"
            ))),
        }
    }

    fn kind(&mut self, node: &'a Map<String, Value>, depth: usize) -> Result<SchemaKind> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(self.error(format!(
                "schema nesting exceeds maximum depth of {MAX_SCHEMA_DEPTH}"
            )));
        }

        self.nodes += 1;
        if self.nodes > MAX_SCHEMA_NODES {
            return Err(self.error(format!(
                "schema expands to more than {MAX_SCHEMA_NODES} nodes"
            )));
        }

        if let Some(reference) = node.get("$ref") {
            return self.reference(reference, depth);
        }

        if let Some(values) = node.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| self.error("'enum' must be an array"))?;
            let declared = node
                .get("type")
                .and_then(Value::as_str)
                .and_then(PrimitiveType::from_keyword);
            return Ok(SchemaKind::Enum {
                base: declared.or_else(|| PrimitiveType::of_literals(values)),
                values: values.clone(),
            });
        }

        if let Some(value) = node.get("const") {
            return Ok(SchemaKind::Enum {
                base: PrimitiveType::of_literals(std::slice::from_ref(value)),
                values: vec![value.clone()],
            });
        }

        for combinator in ["anyOf", "oneOf", "allOf"] {
            if let Some(branches) = node.get(combinator) {
                return self.combinator(combinator, branches, depth);
            }
        }

        match node.get("type") {
            Some(Value::String(t)) => self.kind_for_type(t, node, depth),
            Some(Value::Array(types)) => {
                let mut non_null = Vec::new();
                for t in types {
                    let t = t
                        .as_str()
                        .ok_or_else(|| self.error("'type' array must contain only strings"))?;
                    if t != "null" {
                        non_null.push(t);
                    }
                }
                let nullable = non_null.len() < types.len();
                match non_null.as_slice() {
                    [] => Ok(SchemaKind::Primitive {
                        primitive: PrimitiveType::Null,
                    }),
                    [single] if nullable => {
                        Ok(SchemaKind::nullable(self.kind_for_type(single, node, depth)?))
                    }
                    [single] => self.kind_for_type(single, node, depth),
                    _ => Ok(SchemaKind::Unknown),
                }
            }
            Some(_) => Err(self.error("'type' must be a string or an array of strings")),
            None if node.contains_key("properties") => self.kind_for_type("object", node, depth),
            None if node.contains_key("items") => self.kind_for_type("array", node, depth),
            None => Ok(SchemaKind::Unknown),
        }
    }

    fn kind_for_type(
        &mut self,
        keyword: &str,
        node: &'a Map<String, Value>,
        depth: usize,
    ) -> Result<SchemaKind> {
        match keyword {
            "object" => Ok(SchemaKind::Object {
                fields: self.fields(node, depth + 1)?,
                additional_properties: additional_properties(node),
            }),
            "array" => {
                let items = match node.get("items") {
                    None | Some(Value::Bool(_)) => None,
                    Some(Value::Object(items)) => Some(Box::new(self.kind(items, depth + 1)?)),
                    // Tuple-form items have no homogeneous element type.
                    Some(Value::Array(_)) => Some(Box::new(SchemaKind::Unknown)),
                    Some(_) => return Err(self.error("'items' must be an object or array")),
                };
                Ok(SchemaKind::Array { items })
            }
            other => Ok(PrimitiveType::from_keyword(other).map_or_else(
                || {
                    tracing::debug!("Tool '{}' uses unknown type '{}'", self.tool, other);
                    SchemaKind::Unknown
                },
                |primitive| SchemaKind::Primitive { primitive },
            )),
        }
    }

    fn combinator(
        &mut self,
        combinator: &str,
        branches: &'a Value,
        depth: usize,
    ) -> Result<SchemaKind> {
        let branches = branches
            .as_array()
            .ok_or_else(|| self.error(format!("'{combinator}' must be an array")))?;

        let mut candidates = Vec::new();
        let mut nullable = false;
        for branch in branches {
            match branch {
                Value::Object(map) if is_null_schema(map) => nullable = true,
                Value::Object(map) => candidates.push(map),
                Value::Bool(_) => return Ok(SchemaKind::Unknown),
                _ => {
                    return Err(self.error(format!(
                        "'{combinator}' branches must be objects or booleans"
                    )));
                }
            }
        }

        match candidates.as_slice() {
            [single] if nullable => Ok(SchemaKind::nullable(self.kind(single, depth + 1)?)),
            [single] => self.kind(single, depth + 1),
            _ => Ok(SchemaKind::Unknown),
        }
    }

    fn reference(&mut self, reference: &'a Value, depth: usize) -> Result<SchemaKind> {
        let (reference, target) = self.resolve(reference)?;

        self.ref_stack.push(reference.to_string());
        let kind = self.kind(target, depth + 1);
        self.ref_stack.pop();
        kind
    }

    /// Looks up a local `$ref`, rejecting references already being expanded.
    fn resolve(&self, reference: &'a Value) -> Result<(&'a str, &'a Map<String, Value>)> {
        let reference = reference
            .as_str()
            .ok_or_else(|| self.error("'$ref' must be a string"))?;

        if self.ref_stack.iter().any(|seen| seen == reference) {
            return Err(self.error(format!(
                "recursive '$ref' {reference} describes an unbounded type"
            )));
        }

        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| self.error(format!("only local '$ref' values are supported: {reference}")))?;
        let target = self
            .root
            .pointer(pointer)
            .and_then(Value::as_object)
            .ok_or_else(|| self.error(format!("unresolvable '$ref' {reference}")))?;

        Ok((reference, target))
    }
}

fn is_null_schema(node: &Map<String, Value>) -> bool {
    node.get("type").and_then(Value::as_str) == Some("null")
}

fn additional_properties(node: &Map<String, Value>) -> bool {
    !matches!(node.get("additionalProperties"), Some(Value::Bool(false)))
}

fn metadata(node: &Map<String, Value>) -> Map<String, Value> {
    node.iter()
        .filter(|(key, _)| !TYPE_KEYWORDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
