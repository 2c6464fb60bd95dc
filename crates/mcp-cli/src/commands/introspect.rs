//! Introspect command implementation.
//!
//! Launches one MCP server, lists its tools and shows the names each tool
//! would be generated under.

use super::common::{ServerArgs, build_server_config, load_from_config};
use crate::formatters::format_output;
use anyhow::{Context, Result, bail};
use clap::Args;
use mcp_toolgen_codegen::ToolGenerator;
use mcp_toolgen_codegen::translator::translate;
use mcp_toolgen_core::cli::{ExitCode, OutputFormat};
use mcp_toolgen_core::{RejectedTool, ServerCatalog, ServerId};
use mcp_toolgen_introspector::StaticSource;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Arguments of the `introspect` command.
#[derive(Args, Debug, Clone, Default)]
pub struct IntrospectArgs {
    /// Server command (binary name or path)
    #[arg(required_unless_present_any = ["from_config", "tools_file"])]
    pub server: Option<String>,

    /// Launch options for the server command
    #[command(flatten)]
    pub server_args: ServerArgs,

    /// Load the server from mcp.json by name instead of a command
    #[arg(long = "from-config", conflicts_with_all = ["server", "tools_file"])]
    pub from_config: Option<String>,

    /// Path to mcp.json (default: ~/.claude/mcp.json)
    #[arg(long = "mcp-json")]
    pub mcp_json: Option<PathBuf>,

    /// Read a saved tool listing (JSON) instead of launching a server
    #[arg(long = "tools-file", conflicts_with = "server")]
    pub tools_file: Option<PathBuf>,

    /// Show parameter details for every tool
    #[arg(short, long)]
    pub detailed: bool,
}

/// What `introspect` prints.
#[derive(Debug, Serialize)]
pub struct IntrospectionReport {
    /// Server id
    pub server_id: String,
    /// Name from the server handshake
    pub server_name: String,
    /// Version from the server handshake
    pub server_version: String,
    /// Module the server would be generated into
    pub module_name: String,
    /// Number of usable tools
    pub tool_count: usize,
    /// Usable tools in discovery order
    pub tools: Vec<ToolSummary>,
    /// Tools whose schema was rejected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedTool>,
}

/// One tool in an [`IntrospectionReport`].
#[derive(Debug, Serialize)]
pub struct ToolSummary {
    /// Qualified name (`server.tool`)
    pub name: String,
    /// Generated stub name
    pub function_name: String,
    /// Tool description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parameter details, with `--detailed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterSummary>>,
}

/// One parameter in a [`ToolSummary`].
#[derive(Debug, Serialize)]
pub struct ParameterSummary {
    /// Wire name
    pub name: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Translated type
    #[serde(rename = "type")]
    pub annotation: Value,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Runs the introspect command.
///
/// # Errors
///
/// Returns an error if the server cannot be configured, launched or
/// listed.
pub async fn run(args: IntrospectArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let generator = ToolGenerator::new()?;
    let server_id = scan(&generator, &args).await?;

    let catalog = generator.registry().server(&server_id)?;
    let report = build_report(&generator, &catalog, args.detailed)?;
    info!(
        "Server '{}' exposes {} tool(s)",
        report.server_id, report.tool_count
    );

    println!("{}", format_output(&report, output_format)?);
    Ok(ExitCode::SUCCESS)
}

async fn scan(generator: &ToolGenerator, args: &IntrospectArgs) -> Result<ServerId> {
    if let Some(path) = &args.tools_file {
        let source = StaticSource::from_json_file(path)
            .with_context(|| format!("failed to read tool listing {}", path.display()))?;
        let server_id = match &args.server_args.name {
            Some(name) => ServerId::new(name),
            None => ServerId::new(
                path.file_stem()
                    .map_or_else(|| "server".into(), |s| s.to_string_lossy()),
            ),
        };
        generator.scan_source(server_id.clone(), &source).await?;
        return Ok(server_id);
    }

    let (server_id, config) = if let Some(entry) = &args.from_config {
        load_from_config(
            entry,
            args.mcp_json.as_deref(),
            args.server_args.name.as_deref(),
        )?
    } else if let Some(command) = &args.server {
        build_server_config(command, &args.server_args)?
    } else {
        bail!("a server command, --from-config or --tools-file is required");
    };

    info!("Introspecting server '{}': {}", server_id, config.display_command());
    generator
        .connect_and_scan_as(server_id.clone(), config)
        .await
        .with_context(|| format!("failed to introspect server '{server_id}'"))?;
    Ok(server_id)
}

fn build_report(
    generator: &ToolGenerator,
    catalog: &ServerCatalog,
    detailed: bool,
) -> Result<IntrospectionReport> {
    let mut module_name = String::new();
    let mut tools = Vec::with_capacity(catalog.tools.len());

    for tool in &catalog.tools {
        let info = generator.get_tool_info(&tool.qualified_name())?;
        module_name.clone_from(&info.symbol.derived_module_name);

        let parameters = detailed.then(|| {
            tool.input_schema
                .parameters
                .iter()
                .map(|p| ParameterSummary {
                    name: p.name.clone(),
                    required: p.required,
                    annotation: serde_json::to_value(translate(p)).unwrap_or(Value::Null),
                    description: p.description.clone(),
                })
                .collect()
        });

        tools.push(ToolSummary {
            name: tool.qualified_name(),
            function_name: info.symbol.derived_function_name,
            description: tool.description.clone(),
            parameters,
        });
    }

    if module_name.is_empty() {
        module_name = mcp_toolgen_codegen::IdentifierMapper::new().module_name(&catalog.server_id)?;
    }

    Ok(IntrospectionReport {
        server_id: catalog.server_id.to_string(),
        server_name: catalog.server_name.clone(),
        server_version: catalog.server_version.clone(),
        module_name,
        tool_count: tools.len(),
        tools,
        rejected: catalog.rejected.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn listing(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("gdrive.json");
        fs::write(
            &path,
            r#"{"tools": [
                {"name": "get-document!", "description": "Fetch a document",
                 "inputSchema": {"type": "object",
                                 "properties": {"document_id": {"type": "string"}},
                                 "required": ["document_id"]}},
                {"name": "broken", "inputSchema": "nope"}
            ]}"#,
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_report_from_tools_file() {
        let temp = TempDir::new().unwrap();
        let args = IntrospectArgs {
            tools_file: Some(listing(&temp)),
            detailed: true,
            ..IntrospectArgs::default()
        };

        let generator = ToolGenerator::new().unwrap();
        let server_id = scan(&generator, &args).await.unwrap();
        assert_eq!(server_id.as_str(), "gdrive");

        let catalog = generator.registry().server(&server_id).unwrap();
        let report = build_report(&generator, &catalog, true).unwrap();

        assert_eq!(report.module_name, "gdrive");
        assert_eq!(report.tool_count, 1);
        assert_eq!(report.tools[0].name, "gdrive.get-document!");
        assert_eq!(report.tools[0].function_name, "get_document_");
        assert_eq!(report.rejected.len(), 1);

        let parameters = report.tools[0].parameters.as_ref().unwrap();
        assert_eq!(parameters[0].name, "document_id");
        assert!(parameters[0].required);
        assert_eq!(parameters[0].annotation["primitive"], "string");
    }

    #[tokio::test]
    async fn test_run_with_tools_file() {
        let temp = TempDir::new().unwrap();
        let args = IntrospectArgs {
            tools_file: Some(listing(&temp)),
            ..IntrospectArgs::default()
        };

        let code = run(args, OutputFormat::Json).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_run_requires_source() {
        let result = run(IntrospectArgs::default(), OutputFormat::Json).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_missing_binary_fails() {
        let args = IntrospectArgs {
            server: Some("mcp-toolgen-definitely-missing-binary".to_string()),
            ..IntrospectArgs::default()
        };
        assert!(run(args, OutputFormat::Json).await.is_err());
    }
}
