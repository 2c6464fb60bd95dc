//! Generate command implementation.
//!
//! Scans one or more MCP servers and writes a typed Rust module per server.
//! Servers come from any mix of:
//!
//! 1. a command line (`generate npx --arg=-y --arg=@scope/server-gdrive`)
//! 2. `--from-config NAME` entries of `~/.claude/mcp.json`
//! 3. `--tools-file FILE` saved tool listings (no server is launched)
//! 4. the `[servers]` table of the generator config file
//!
//! Output directory and overwrite default to the config file's `[output]`
//! table; CLI flags win.

use super::common::{ServerArgs, build_server_config, load_from_config};
use crate::formatters::format_output;
use anyhow::{Context, Result, bail};
use clap::Args;
use mcp_toolgen_codegen::{GenerateOptions, GenerationReport, ToolGenerator};
use mcp_toolgen_core::cli::{ExitCode, OutputFormat, parse_server_id};
use mcp_toolgen_core::config::GeneratorConfig;
use mcp_toolgen_core::ServerId;
use mcp_toolgen_files::expand_tilde;
use mcp_toolgen_introspector::{StaticSource, StdioSource, ToolSource};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Arguments of the `generate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Server command (binary name or path)
    pub server: Option<String>,

    /// Launch options for the server command
    #[command(flatten)]
    pub server_args: ServerArgs,

    /// Load servers from mcp.json by name (repeatable)
    #[arg(long = "from-config", num_args = 1)]
    pub from_config: Vec<String>,

    /// Path to mcp.json (default: ~/.claude/mcp.json)
    #[arg(long = "mcp-json")]
    pub mcp_json: Option<PathBuf>,

    /// Saved tool listings (JSON) to generate from (repeatable)
    #[arg(long = "tools-file", num_args = 1)]
    pub tools_files: Vec<PathBuf>,

    /// Generator config file (default: ~/.config/mcp-toolgen/config.toml)
    #[arg(long, env = "MCP_TOOLGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory (default: from config, else ./generated_servers)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace existing files whose content differs
    #[arg(long)]
    pub overwrite: bool,

    /// Generate only this server, or rename the only server's module
    #[arg(long = "server-name")]
    pub server_name: Option<String>,

    /// Report what would be written without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// What `generate` prints.
#[derive(Debug, Serialize)]
pub struct GenerationSummary {
    /// Output root
    pub output_dir: PathBuf,
    /// Whether nothing was written
    pub dry_run: bool,
    /// Per-server outcomes, in scan order
    pub servers: Vec<ServerSummary>,
    /// Servers that could not be scanned
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scan_failures: Vec<ScanFailure>,
}

/// One server in a [`GenerationSummary`].
#[derive(Debug, Serialize)]
pub struct ServerSummary {
    /// Server id
    pub server_id: String,
    /// Output module
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Last stage reached
    pub stage: String,
    /// Files with what happened to each
    pub files: Vec<FileSummary>,
    /// Tools skipped because of a rejected schema
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// Error, if the server failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One file in a [`ServerSummary`].
#[derive(Debug, Serialize)]
pub struct FileSummary {
    /// Path on disk
    pub path: PathBuf,
    /// `created`, `updated` or `unchanged`
    pub outcome: String,
}

/// A server that failed before generation.
#[derive(Debug, Serialize)]
pub struct ScanFailure {
    /// Server id
    pub server_id: String,
    /// Error message
    pub error: String,
}

/// Runs the generate command.
///
/// Exit codes: success when every server was generated, partial failure
/// when some were, error when none were.
///
/// # Errors
///
/// Returns an error if no server is given, the config cannot be loaded,
/// or `--server-name` selects nothing.
pub async fn run(args: GenerateArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let config = GeneratorConfig::load_or_default(args.config.as_deref())
        .context("failed to load generator config")?;

    let sources = collect_sources(&args, &config)?;
    if sources.is_empty() {
        bail!("no servers to generate: pass a command, --from-config, --tools-file or configure [servers]");
    }

    let options = GenerateOptions::new(output_dir(&args, &config)?)
        .with_overwrite(args.overwrite || config.output.overwrite)
        .with_dry_run(args.dry_run);

    let generator = ToolGenerator::new()?;
    info!("Scanning {} server(s)", sources.len());
    let outcomes = generator.scan_all(sources).await;

    let scan_failures: Vec<ScanFailure> = outcomes
        .into_iter()
        .filter_map(|outcome| {
            outcome.result.err().map(|e| {
                warn!("Skipping server '{}': {}", outcome.server_id, e);
                ScanFailure {
                    server_id: outcome.server_id.to_string(),
                    error: e.to_string(),
                }
            })
        })
        .collect();

    let report = generator.generate(&options, args.server_name.as_deref())?;
    let summary = summarize(&report, scan_failures);
    let exit_code = exit_code_for(&summary);

    println!("{}", format_output(&summary, output_format)?);
    Ok(exit_code)
}

/// Resolves every server source the arguments and config describe.
///
/// # Errors
///
/// Returns an error if a source is misconfigured or two sources share a
/// server id.
pub fn collect_sources(
    args: &GenerateArgs,
    config: &GeneratorConfig,
) -> Result<Vec<(ServerId, Arc<dyn ToolSource>)>> {
    let mut sources: Vec<(ServerId, Arc<dyn ToolSource>)> = Vec::new();
    let name = args.server_args.name.as_deref();
    let single = args.from_config.len() + usize::from(args.server.is_some()) + args.tools_files.len() == 1;

    if let Some(command) = &args.server {
        let (id, server) = build_server_config(command, &args.server_args)?;
        sources.push((id, Arc::new(StdioSource::new(server))));
    }

    for entry in &args.from_config {
        let (id, server) = load_from_config(entry, args.mcp_json.as_deref(), name.filter(|_| single))?;
        sources.push((id, Arc::new(StdioSource::new(server))));
    }

    for path in &args.tools_files {
        let source = StaticSource::from_json_file(path)
            .with_context(|| format!("failed to read tool listing {}", path.display()))?;
        let id = match name.filter(|_| single) {
            Some(name) => parse_server_id(name)?,
            None => parse_server_id(&listing_stem(path))?,
        };
        sources.push((id, Arc::new(source)));
    }

    if sources.is_empty() {
        for (id, server) in &config.servers {
            sources.push((parse_server_id(id)?, Arc::new(StdioSource::new(server.clone()))));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for (id, _) in &sources {
        if !seen.insert(id.clone()) {
            bail!("server id '{id}' is used by more than one source; pass --name to rename one");
        }
    }

    Ok(sources)
}

fn output_dir(args: &GenerateArgs, config: &GeneratorConfig) -> Result<PathBuf> {
    let dir = args.output.as_ref().unwrap_or(&config.output.dir);
    Ok(expand_tilde(dir)?)
}

fn listing_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "server".to_string(), |s| s.to_string_lossy().into_owned())
}

fn summarize(report: &GenerationReport, scan_failures: Vec<ScanFailure>) -> GenerationSummary {
    let servers = report
        .servers
        .iter()
        .map(|server| ServerSummary {
            server_id: server.server_id.to_string(),
            module: server.module_name.clone(),
            stage: server.stage.to_string(),
            files: server
                .files
                .iter()
                .map(|f| FileSummary {
                    path: f.path.clone(),
                    outcome: f.outcome.to_string(),
                })
                .collect(),
            skipped: server
                .skipped
                .iter()
                .map(|t| format!("{}: {}", t.name, t.reason))
                .collect(),
            error: server.failure.as_ref().map(|f| f.error.to_string()),
        })
        .collect();

    GenerationSummary {
        output_dir: report.output_dir.clone(),
        dry_run: report.dry_run,
        servers,
        scan_failures,
    }
}

fn exit_code_for(summary: &GenerationSummary) -> ExitCode {
    let succeeded = summary.servers.iter().filter(|s| s.error.is_none()).count();
    let failed = summary.servers.len() - succeeded + summary.scan_failures.len();

    match (succeeded, failed) {
        (_, 0) => ExitCode::SUCCESS,
        (0, _) => ExitCode::ERROR,
        _ => ExitCode::PARTIAL_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_listing(dir: &Path, name: &str, tools: &str) -> PathBuf {
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, format!(r#"{{"tools": {tools}}}"#)).unwrap();
        path
    }

    const GDRIVE_TOOLS: &str = r#"[
        {"name": "get-document!", "inputSchema": {"type": "object",
            "properties": {"document_id": {"type": "string"}}, "required": ["document_id"]}},
        {"name": "search", "inputSchema": {"type": "object"}}
    ]"#;

    fn args_for(temp: &TempDir, files: Vec<PathBuf>) -> GenerateArgs {
        GenerateArgs {
            tools_files: files,
            config: Some(temp.path().join("config.toml")),
            output: Some(temp.path().join("out")),
            ..GenerateArgs::default()
        }
    }

    #[tokio::test]
    async fn test_generate_from_tools_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        let listing = write_listing(temp.path(), "gdrive", GDRIVE_TOOLS);

        let code = run(args_for(&temp, vec![listing]), OutputFormat::Json)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let tools = fs::read_to_string(temp.path().join("out/gdrive/tools.rs")).unwrap();
        assert!(tools.contains("pub async fn get_document_(client: &Client, document_id: String)"));
    }

    #[tokio::test]
    async fn test_conflict_is_partial_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        let gdrive = write_listing(temp.path(), "gdrive", GDRIVE_TOOLS);
        let files = write_listing(temp.path(), "files", r#"[{"name": "list_files", "inputSchema": {"type": "object"}}]"#);

        let edited = temp.path().join("out/gdrive/mod.rs");
        fs::create_dir_all(edited.parent().unwrap()).unwrap();
        fs::write(&edited, "// mine\n").unwrap();

        let code = run(args_for(&temp, vec![gdrive, files]), OutputFormat::Text)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::PARTIAL_FAILURE);
        assert_eq!(fs::read_to_string(&edited).unwrap(), "// mine\n");
        assert!(temp.path().join("out/files/tools.rs").exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        let listing = write_listing(temp.path(), "gdrive", GDRIVE_TOOLS);

        let mut args = args_for(&temp, vec![listing]);
        args.dry_run = true;

        let code = run(args, OutputFormat::Json).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!temp.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_no_sources_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();

        assert!(run(args_for(&temp, vec![]), OutputFormat::Json).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_server_name_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        let gdrive = write_listing(temp.path(), "gdrive", GDRIVE_TOOLS);
        let files = write_listing(temp.path(), "files", "[]");

        let mut args = args_for(&temp, vec![gdrive, files]);
        args.server_name = Some("github".to_string());

        assert!(run(args, OutputFormat::Json).await.is_err());
    }

    #[test]
    fn test_config_servers_used_when_no_sources_given() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            [servers.github]
            command = "docker"
            args = ["run", "-i", "--rm", "ghcr.io/github/github-mcp-server"]

            [servers.gdrive]
            command = "npx"
            "#,
        )
        .unwrap();

        let sources = collect_sources(&GenerateArgs::default(), &config).unwrap();
        let ids: Vec<_> = sources.iter().map(|(id, _)| id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["gdrive", "github"]);
    }

    #[test]
    fn test_duplicate_server_ids_rejected() {
        let temp = TempDir::new().unwrap();
        let first = write_listing(temp.path(), "gdrive", "[]");
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        let second = write_listing(&nested, "gdrive", "[]");

        let args = GenerateArgs {
            tools_files: vec![first, second],
            ..GenerateArgs::default()
        };
        let err = collect_sources(&args, &GeneratorConfig::default()).err().expect("expected duplicate server id error");
        assert!(err.to_string().contains("more than one source"));
    }

    #[test]
    fn test_output_flag_overrides_config() {
        let mut config = GeneratorConfig::default();
        config.output.dir = PathBuf::from("from-config");

        let args = GenerateArgs {
            output: Some(PathBuf::from("from-flag")),
            ..GenerateArgs::default()
        };
        assert_eq!(output_dir(&args, &config).unwrap(), PathBuf::from("from-flag"));
        assert_eq!(
            output_dir(&GenerateArgs::default(), &config).unwrap(),
            PathBuf::from("from-config")
        );
    }

    #[test]
    fn test_exit_code_mapping() {
        let ok = ServerSummary {
            server_id: "a".to_string(),
            module: Some("a".to_string()),
            stage: "written".to_string(),
            files: Vec::new(),
            skipped: Vec::new(),
            error: None,
        };
        let summary = GenerationSummary {
            output_dir: PathBuf::from("out"),
            dry_run: false,
            servers: vec![ok],
            scan_failures: vec![ScanFailure {
                server_id: "b".to_string(),
                error: "connection refused".to_string(),
            }],
        };
        assert_eq!(exit_code_for(&summary), ExitCode::PARTIAL_FAILURE);

        let failed_only = GenerationSummary {
            servers: Vec::new(),
            ..summary
        };
        assert_eq!(exit_code_for(&failed_only), ExitCode::ERROR);
    }
}
