//! Spelling type annotations as Rust types.
//!
//! Scalars and containers map to standard types. Records and string enums
//! become named `struct`s and `enum`s collected by the renderer, named
//! after where they occur (`create_issue` + `author` -> `CreateIssueAuthor`).
//!
//! | Annotation | Rust |
//! |------------|------|
//! | string / integer / number / boolean / null | `String` / `i64` / `f64` / `bool` / `()` |
//! | sequence | `Vec<T>` |
//! | record | generated `struct` |
//! | mapping | `Map<String, Value>` |
//! | string literals | generated `enum` |
//! | nullable | `Option<T>` |
//! | other literals | base scalar, or `Value` |
//! | any | `Value` |

use crate::identifiers::{Namespace, sanitize, to_pascal_case, type_namespace};
use crate::translator::{FieldAnnotation, TypeAnnotation, describe_literals};
use mcp_toolgen_core::{PrimitiveType, Result};
use serde::Serialize;

/// Generated `struct` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDef {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub doc: Vec<String>,
    /// Fields in schema order
    pub fields: Vec<FieldDef>,
}

/// One field of a [`StructDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Rust field name
    pub ident: String,
    /// Wire name as a Rust string literal
    pub wire_literal: String,
    /// Whether a `#[serde(rename)]` is needed
    pub rename: bool,
    /// Field type. Already `Option<T>` for a required nullable field.
    pub rust_type: String,
    /// Whether the field may be absent (wrapped in `Option`, skipped when `None`)
    pub optional: bool,
    /// Doc comment lines
    pub doc: Vec<String>,
}

/// Generated `enum` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDef {
    /// Type name
    pub name: String,
    /// Doc comment lines
    pub doc: Vec<String>,
    /// Variants in literal order
    pub variants: Vec<VariantDef>,
}

/// One variant of an [`EnumDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDef {
    /// Variant name
    pub ident: String,
    /// Literal as a Rust string literal
    pub literal: String,
}

/// Renders annotations for one server module and collects the named types
/// they need.
#[derive(Debug)]
pub struct RustTypeRenderer {
    names: Namespace,
    structs: Vec<StructDef>,
    enums: Vec<EnumDef>,
}

impl RustTypeRenderer {
    /// Creates a renderer for the module `module_name`.
    #[must_use]
    pub fn new(module_name: &str) -> Self {
        Self {
            names: type_namespace(module_name),
            structs: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Returns the Rust type for `annotation`.
    ///
    /// `hint` names the location (e.g. `create_issue_author`) and seeds the
    /// names of any generated types.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollisionExhausted` if a type or member name
    /// cannot be made unique.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_codegen::rust_types::RustTypeRenderer;
    /// use mcp_toolgen_codegen::translator::TypeAnnotation;
    /// use serde_json::json;
    ///
    /// let mut renderer = RustTypeRenderer::new("github");
    /// let state = TypeAnnotation::Literals {
    ///     base: None,
    ///     values: vec![json!("open"), json!("closed")],
    /// };
    ///
    /// assert_eq!(renderer.render(&state, "list_issues_state").unwrap(), "ListIssuesState");
    /// assert_eq!(renderer.enums()[0].variants[1].ident, "Closed");
    /// ```
    pub fn render(&mut self, annotation: &TypeAnnotation, hint: &str) -> Result<String> {
        match annotation {
            TypeAnnotation::Scalar { primitive } => Ok(scalar(*primitive).to_string()),
            TypeAnnotation::Sequence { element } => {
                let element = self.render(element, &format!("{hint}_item"))?;
                Ok(format!("Vec<{element}>"))
            }
            TypeAnnotation::Record { fields, .. } => self.record(fields, hint),
            TypeAnnotation::Mapping => Ok("Map<String, Value>".to_string()),
            TypeAnnotation::Literals { base, values } => match annotation.string_literals() {
                Some(literals) => self.string_enum(&literals, values, hint),
                None => Ok(base.map_or("Value", scalar).to_string()),
            },
            TypeAnnotation::Nullable { inner } => {
                let inner = self.render(inner, hint)?;
                Ok(format!("Option<{inner}>"))
            }
            TypeAnnotation::Any => Ok("Value".to_string()),
        }
    }

    /// Returns the Rust type of a field or parameter, without the `Option`
    /// wrapper an optional one gets.
    ///
    /// A required nullable value keeps its `Option<T>` so `None` is sent as
    /// `null`; for an optional one, absent and `null` collapse into `None`.
    ///
    /// # Errors
    ///
    /// Same as [`RustTypeRenderer::render`].
    pub fn render_member(
        &mut self,
        annotation: &TypeAnnotation,
        required: bool,
        hint: &str,
    ) -> Result<String> {
        if required {
            self.render(annotation, hint)
        } else {
            self.render(annotation.non_null(), hint)
        }
    }

    /// Returns the structs generated so far.
    #[must_use]
    pub fn structs(&self) -> &[StructDef] {
        &self.structs
    }

    /// Returns the enums generated so far.
    #[must_use]
    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    /// Consumes the renderer and returns every generated definition.
    #[must_use]
    pub fn into_definitions(self) -> (Vec<StructDef>, Vec<EnumDef>) {
        (self.structs, self.enums)
    }

    fn type_name(&mut self, hint: &str, fallback: &str) -> Result<String> {
        let base = to_pascal_case(hint);
        self.names
            .claim(if base.is_empty() { fallback } else { base.as_str() })
    }

    fn record(&mut self, fields: &[FieldAnnotation], hint: &str) -> Result<String> {
        let name = self.type_name(hint, "Record")?;
        let mut idents = Namespace::new(format!("fields of '{name}'"));

        let mut defs = Vec::with_capacity(fields.len());
        for field in fields {
            let ident = idents.claim(&sanitize(&field.name))?;
            let rust_type = self.render_member(
                &field.annotation,
                field.required,
                &format!("{hint}_{}", field.name),
            )?;
            defs.push(FieldDef {
                rename: ident != field.name,
                wire_literal: rust_string_literal(&field.name),
                ident,
                rust_type,
                optional: !field.required,
                doc: field_doc(field),
            });
        }

        self.structs.push(StructDef {
            doc: vec![format!("`{hint}` argument record.")],
            name: name.clone(),
            fields: defs,
        });
        Ok(name)
    }

    fn string_enum(
        &mut self,
        literals: &[&str],
        values: &[serde_json::Value],
        hint: &str,
    ) -> Result<String> {
        let name = self.type_name(hint, "Choice")?;
        let mut idents = Namespace::new(format!("variants of '{name}'"));

        let mut seen = Vec::with_capacity(literals.len());
        let mut variants = Vec::with_capacity(literals.len());
        for literal in literals {
            if seen.contains(literal) {
                continue;
            }
            seen.push(*literal);

            let base = match to_pascal_case(literal) {
                base if !base.is_empty() => base,
                _ if literal.is_empty() => "Empty".to_string(),
                _ => "Variant".to_string(),
            };
            variants.push(VariantDef {
                ident: idents.claim(&base)?,
                literal: rust_string_literal(literal),
            });
        }

        self.enums.push(EnumDef {
            doc: vec![format!("Allowed values: {}.", describe_literals(values))],
            name: name.clone(),
            variants,
        });
        Ok(name)
    }
}

/// Rust spelling of a scalar type.
#[must_use]
pub const fn scalar(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String => "String",
        PrimitiveType::Integer => "i64",
        PrimitiveType::Number => "f64",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Null => "()",
    }
}

/// Quotes `text` as a Rust string literal.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_codegen::rust_types::rust_string_literal;
///
/// assert_eq!(rust_string_literal("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
#[must_use]
pub fn rust_string_literal(text: &str) -> String {
    format!("{text:?}")
}

/// Splits free text into doc comment lines.
///
/// `\r\n` and lone `\r` both count as line breaks, since a bare carriage
/// return ends a `//` comment. Trailing whitespace is dropped and code fences
/// are neutralized so that descriptions never turn into doctests.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_codegen::rust_types::doc_lines;
///
/// assert_eq!(doc_lines("one\r\ntwo\rthree "), vec!["one", "two", "three"]);
/// ```
#[must_use]
pub fn doc_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .lines()
        .map(|line| line.trim_end().replace("```", "'''"))
        .collect()
}

fn field_doc(field: &FieldAnnotation) -> Vec<String> {
    let mut doc = field
        .description
        .as_deref()
        .map(doc_lines)
        .unwrap_or_default();

    let annotation = field.annotation.non_null();
    if let TypeAnnotation::Literals { values, .. } = annotation
        && annotation.string_literals().is_none()
    {
        doc.push(format!("Allowed values: {}.", describe_literals(values)));
    }
    if let Some(default) = &field.default {
        doc.push(format!("Defaults to `{default}`."));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, annotation: TypeAnnotation, required: bool) -> FieldAnnotation {
        FieldAnnotation {
            name: name.to_string(),
            annotation,
            required,
            description: None,
            default: None,
        }
    }

    const STRING: TypeAnnotation = TypeAnnotation::Scalar {
        primitive: PrimitiveType::String,
    };

    #[test]
    fn test_scalars_and_containers() {
        let mut r = RustTypeRenderer::new("m");
        assert_eq!(r.render(&STRING, "x").unwrap(), "String");
        assert_eq!(
            r.render(
                &TypeAnnotation::Scalar {
                    primitive: PrimitiveType::Null
                },
                "x"
            )
            .unwrap(),
            "()"
        );
        assert_eq!(
            r.render(
                &TypeAnnotation::Sequence {
                    element: Box::new(TypeAnnotation::Scalar {
                        primitive: PrimitiveType::Integer
                    })
                },
                "x"
            )
            .unwrap(),
            "Vec<i64>"
        );
        assert_eq!(r.render(&TypeAnnotation::Mapping, "x").unwrap(), "Map<String, Value>");
        assert_eq!(r.render(&TypeAnnotation::Any, "x").unwrap(), "Value");
        assert!(r.structs().is_empty());
    }

    #[test]
    fn test_nested_records() {
        let mut r = RustTypeRenderer::new("github");
        let author = TypeAnnotation::Record {
            fields: vec![
                field("login", STRING, true),
                field(
                    "address",
                    TypeAnnotation::Record {
                        fields: vec![field("city", STRING, false)],
                        additional_properties: true,
                    },
                    false,
                ),
                field("type", STRING, false),
            ],
            additional_properties: true,
        };

        assert_eq!(r.render(&author, "create_issue_author").unwrap(), "CreateIssueAuthor");

        let (structs, _) = r.into_definitions();
        let names: Vec<_> = structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CreateIssueAuthorAddress", "CreateIssueAuthor"]);

        let outer = &structs[1];
        assert_eq!(outer.fields[1].rust_type, "CreateIssueAuthorAddress");
        assert!(outer.fields[1].optional);
        assert_eq!(outer.fields[2].ident, "type_");
        assert!(outer.fields[2].rename);
        assert_eq!(outer.fields[2].wire_literal, "\"type\"");
        assert!(!outer.fields[0].rename);
    }

    #[test]
    fn test_type_names_unique_and_reserved() {
        let mut r = RustTypeRenderer::new("m");
        let record = TypeAnnotation::Record {
            fields: vec![field("a", STRING, true)],
            additional_properties: true,
        };
        assert_eq!(r.render(&record, "value").unwrap(), "Value_2");
        assert_eq!(r.render(&record, "value").unwrap(), "Value_3");
        assert_eq!(r.render(&record, "!!").unwrap(), "Record");
    }

    #[test]
    fn test_string_enum_variants() {
        let mut r = RustTypeRenderer::new("m");
        let literals = TypeAnnotation::Literals {
            base: Some(PrimitiveType::String),
            values: vec![
                json!("in-progress"),
                json!("in_progress"),
                json!(""),
                json!("in-progress"),
                json!("2fa"),
            ],
        };

        assert_eq!(r.render(&literals, "task_state").unwrap(), "TaskState");
        let variants: Vec<_> = r.enums()[0]
            .variants
            .iter()
            .map(|v| (v.ident.as_str(), v.literal.as_str()))
            .collect();
        assert_eq!(
            variants,
            vec![
                ("InProgress", "\"in-progress\""),
                ("InProgress_2", "\"in_progress\""),
                ("Empty", "\"\""),
                ("_2fa", "\"2fa\""),
            ]
        );
    }

    #[test]
    fn test_non_string_literals_use_base() {
        let mut r = RustTypeRenderer::new("m");
        let numbers = TypeAnnotation::Literals {
            base: Some(PrimitiveType::Integer),
            values: vec![json!(1), json!(2)],
        };
        let mixed = TypeAnnotation::Literals {
            base: None,
            values: vec![json!(1), json!("a")],
        };
        assert_eq!(r.render(&numbers, "n").unwrap(), "i64");
        assert_eq!(r.render(&mixed, "n").unwrap(), "Value");
        assert!(r.enums().is_empty());
    }

    #[test]
    fn test_field_doc_mentions_constraints() {
        let mut f = field(
            "level",
            TypeAnnotation::Literals {
                base: Some(PrimitiveType::Integer),
                values: vec![json!(1), json!(2)],
            },
            false,
        );
        f.description = Some("Verbosity\n\n```\nlevel=1\n```  ".to_string());
        f.default = Some(json!(1));

        let doc = field_doc(&f);
        assert_eq!(doc[0], "Verbosity");
        assert_eq!(doc[2], "'''");
        assert!(doc.contains(&"Allowed values: `1`, `2`.".to_string()));
        assert_eq!(doc.last().unwrap(), "Defaults to `1`.");
    }

    #[test]
    fn test_nullable_members() {
        let mut r = RustTypeRenderer::new("m");
        let nullable = TypeAnnotation::Nullable {
            inner: Box::new(TypeAnnotation::Scalar {
                primitive: PrimitiveType::Integer,
            }),
        };
        let record = TypeAnnotation::Record {
            fields: vec![field("limit", nullable.clone(), true), field("cursor", nullable, false)],
            additional_properties: true,
        };
        r.render(&record, "page").unwrap();

        let fields = &r.structs()[0].fields;
        assert_eq!(fields[0].rust_type, "Option<i64>");
        assert!(!fields[0].optional);
        assert_eq!(fields[1].rust_type, "i64");
        assert!(fields[1].optional);
    }

    #[test]
    fn test_doc_lines_split_carriage_returns() {
        let lines = doc_lines("line one\rline two\r\nline three\r");
        assert_eq!(lines, vec!["line one", "line two", "line three"]);
        for line in &lines {
            assert!(!line.contains('\r'));
            let comment = format!("/// {line}\nstruct S;");
            assert!(syn::parse_file(&comment).is_ok());
        }
    }

    #[test]
    fn test_generated_names_parse_as_idents() {
        let mut r = RustTypeRenderer::new("m");
        let record = TypeAnnotation::Record {
            fields: vec![
                field("3d", STRING, true),
                field("self", STRING, true),
                field("a-b", STRING, true),
            ],
            additional_properties: true,
        };
        r.render(&record, "tool_").unwrap();

        for s in r.structs() {
            assert!(syn::parse_str::<syn::Ident>(&s.name).is_ok());
            for f in &s.fields {
                assert!(syn::parse_str::<syn::Ident>(&f.ident).is_ok(), "{}", f.ident);
                assert!(syn::parse_str::<syn::Type>(&f.rust_type).is_ok());
            }
        }
    }
}
