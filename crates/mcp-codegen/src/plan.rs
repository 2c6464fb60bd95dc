//! Emission plans: everything needed to render one server module.
//!
//! A plan is derived from a [`ServerCatalog`] on every generation run and
//! never persisted. Planning derives identifiers, translates parameter
//! types and prepares the template context; it does no I/O.

use crate::identifiers::{GeneratedSymbol, IdentifierMapper, parameter_namespace, sanitize};
use crate::report::ServerFailure;
use crate::rust_types::{EnumDef, RustTypeRenderer, StructDef, doc_lines, rust_string_literal};
use crate::translator::{TypeAnnotation, describe_literals, translate};
use mcp_toolgen_core::{
    Error, ParameterSpec, RejectedTool, Result, ServerCatalog, ServerId, ToolDescriptor,
};
use serde::Serialize;
use std::collections::HashSet;

/// One parameter of a stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamPlan {
    /// Rust parameter name
    pub ident: String,
    /// Wire name
    pub wire_name: String,
    /// Wire name as a Rust string literal
    pub wire_literal: String,
    /// Declared parameter type (`Option<T>` for optional or nullable parameters)
    pub param_type: String,
    /// Whether the parameter is required
    pub required: bool,
}

/// One generated stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubPlan {
    /// Derived names
    #[serde(flatten)]
    pub symbol: GeneratedSymbol,
    /// Stub function name (same as `symbol.derived_function_name`)
    pub function_name: String,
    /// Raw tool name as a Rust string literal
    pub raw_name_literal: String,
    /// Doc comment lines
    pub doc: Vec<String>,
    /// Parameters: required ones first, then optional ones, each in schema order
    pub params: Vec<ParamPlan>,
    /// Original input schema as a Rust string literal
    pub input_schema_literal: String,
    /// Whether any parameter fell back to an untyped value
    pub degraded: bool,
}

/// Plan for one server module.
#[derive(Debug, Clone, Serialize)]
pub struct ServerPlan {
    /// Server id
    pub server_id: ServerId,
    /// Server name from the handshake
    pub server_name: String,
    /// Server version from the handshake
    pub server_version: String,
    /// Output module (directory) name
    pub module_name: String,
    /// Module doc comment lines
    pub header_doc: Vec<String>,
    /// Stubs in discovery order
    pub stubs: Vec<StubPlan>,
    /// Generated record types
    pub structs: Vec<StructDef>,
    /// Generated enum types
    pub enums: Vec<EnumDef>,
    /// Tools left out because their schema was rejected
    #[serde(skip)]
    pub skipped: Vec<RejectedTool>,
}

/// Plans for a set of servers.
#[derive(Debug, Default)]
pub struct EmissionPlan {
    /// Servers that planned successfully, in input order
    pub servers: Vec<ServerPlan>,
    /// Servers that failed validation or planning
    pub failures: Vec<ServerFailure>,
}

impl EmissionPlan {
    /// Returns the plan for `server_id`, if it planned successfully.
    #[must_use]
    pub fn server(&self, server_id: &ServerId) -> Option<&ServerPlan> {
        self.servers.iter().find(|s| &s.server_id == server_id)
    }

    /// Returns the total number of stubs across all servers.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.servers.iter().map(|s| s.stubs.len()).sum()
    }
}

/// Checks that a catalog can be emitted at all.
///
/// # Errors
///
/// Returns `Error::CodeGeneration` if two tools share a raw name.
pub fn validate_catalog(catalog: &ServerCatalog) -> Result<()> {
    let mut seen = HashSet::with_capacity(catalog.tools.len());
    for tool in &catalog.tools {
        if !seen.insert(tool.name.as_str()) {
            return Err(Error::CodeGeneration {
                target: catalog.server_id.to_string(),
                message: format!("duplicate tool name '{}' in catalog", tool.name),
            });
        }
    }
    Ok(())
}

/// Plans one server module.
///
/// `module_name` overrides the name derived from the server id.
///
/// # Errors
///
/// Returns `Error::NameCollisionExhausted` if identifiers run out and
/// serialization errors if a schema cannot be embedded.
pub fn plan_server(
    catalog: &ServerCatalog,
    mapper: &mut IdentifierMapper,
    module_name: Option<&str>,
) -> Result<ServerPlan> {
    let server_id = &catalog.server_id;
    let module_name = mapper.module_name_from(server_id, module_name.unwrap_or(server_id.as_str()))?;

    let mut types = RustTypeRenderer::new(&module_name);
    let stubs = catalog
        .tools
        .iter()
        .map(|tool| {
            let symbol = mapper.derive(server_id, tool.name.as_str())?;
            plan_stub(tool, symbol, &mut types)
        })
        .collect::<Result<Vec<_>>>()?;

    let degraded = stubs.iter().filter(|s| s.degraded).count();
    if degraded > 0 {
        tracing::warn!(
            "{} tool(s) of '{}' have parameters typed as untyped values",
            degraded,
            server_id
        );
    }

    let (structs, enums) = types.into_definitions();
    tracing::debug!(
        "Planned '{}' as module '{}': {} stub(s), {} struct(s), {} enum(s)",
        server_id,
        module_name,
        stubs.len(),
        structs.len(),
        enums.len()
    );

    Ok(ServerPlan {
        header_doc: header_doc(catalog),
        server_id: server_id.clone(),
        server_name: catalog.server_name.clone(),
        server_version: catalog.server_version.clone(),
        module_name,
        stubs,
        structs,
        enums,
        skipped: catalog.rejected.clone(),
    })
}

fn plan_stub(
    tool: &ToolDescriptor,
    symbol: GeneratedSymbol,
    types: &mut RustTypeRenderer,
) -> Result<StubPlan> {
    let function_name = symbol.derived_function_name.clone();
    let mut idents = parameter_namespace(&function_name);

    let ordered = tool
        .input_schema
        .parameters
        .iter()
        .filter(|p| p.required)
        .chain(tool.input_schema.parameters.iter().filter(|p| !p.required));

    let mut params = Vec::with_capacity(tool.input_schema.parameters.len());
    let mut arg_docs = Vec::new();
    let mut degraded = false;

    for spec in ordered {
        let annotation = translate(spec);
        degraded |= annotation.is_degraded();

        let ident = idents.claim(&sanitize(&spec.name))?;
        let rust_type = types.render_member(
            &annotation,
            spec.required,
            &format!("{function_name}_{}", spec.name),
        )?;

        arg_docs.push(argument_doc(&ident, spec, &annotation));
        params.push(ParamPlan {
            wire_literal: rust_string_literal(&spec.name),
            wire_name: spec.name.clone(),
            param_type: if spec.required {
                rust_type
            } else {
                format!("Option<{rust_type}>")
            },
            required: spec.required,
            ident,
        });
    }

    let schema_json = serde_json::to_string(&tool.raw_input_schema)?;

    Ok(StubPlan {
        doc: stub_doc(tool, arg_docs),
        raw_name_literal: rust_string_literal(tool.name.as_str()),
        input_schema_literal: rust_string_literal(&schema_json),
        function_name,
        symbol,
        params,
        degraded,
    })
}

fn header_doc(catalog: &ServerCatalog) -> Vec<String> {
    let mut doc = vec![format!(
        "Generated bindings for the `{}` MCP server.",
        catalog.server_id
    )];

    let server = format!("{} {}", catalog.server_name, catalog.server_version);
    let server = server.trim();
    if !server.is_empty() {
        doc.push(String::new());
        doc.extend(doc_lines(&format!("Server: {server}")));
    }
    doc
}

fn stub_doc(tool: &ToolDescriptor, arguments: Vec<Vec<String>>) -> Vec<String> {
    let mut doc = doc_lines(&tool.description);
    if !doc.is_empty() {
        doc.push(String::new());
    }
    doc.extend(doc_lines(&format!("Calls the MCP tool `{}`.", tool.name)));

    if !arguments.is_empty() {
        doc.push(String::new());
        doc.push("# Arguments".to_string());
        doc.push(String::new());
        doc.extend(arguments.into_iter().flatten());
    }
    doc
}

fn argument_doc(ident: &str, spec: &ParameterSpec, annotation: &TypeAnnotation) -> Vec<String> {
    let mut text = spec.description.clone().unwrap_or_default();

    let annotation = annotation.non_null();
    if let TypeAnnotation::Literals { values, .. } = annotation
        && annotation.string_literals().is_none()
    {
        text.push_str(&format!(" Allowed values: {}.", describe_literals(values)));
    }
    if let Some(default) = &spec.default {
        text.push_str(&format!(" Defaults to `{default}`."));
    }

    let mut lines = doc_lines(&text).into_iter();
    let first = lines.next().unwrap_or_default();
    let mut doc = vec![
        format!("* `{ident}` - {first}").trim_end().to_string(),
    ];
    doc.extend(lines.map(|line| format!("  {line}").trim_end().to_string()));
    doc
}
