//! Common utilities shared across CLI commands.
//!
//! Builds server launch configurations from CLI arguments or from the
//! Claude-style `mcp.json` file.

use anyhow::{Context, Result};
use clap::Args;
use mcp_toolgen_core::cli::{parse_env_pair, parse_server_id};
use mcp_toolgen_core::config::McpServersFile;
use mcp_toolgen_core::{ServerConfig, ServerId};
use mcp_toolgen_introspector::derive_server_id;
use std::path::{Path, PathBuf};

/// Launch options for a single stdio server.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerArgs {
    /// Arguments to pass to the server command
    #[arg(short, long = "arg", num_args = 1, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Environment variables in KEY=VALUE format
    #[arg(short, long = "env", num_args = 1)]
    pub env: Vec<String>,

    /// Working directory for the server process
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Server id (default: derived from the command line)
    #[arg(long)]
    pub name: Option<String>,
}

/// Builds a `ServerConfig` and server id from CLI arguments.
///
/// # Errors
///
/// Returns an error if an environment variable is not in KEY=VALUE format,
/// the command is empty, or `--name` is not a valid server id.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_cli::commands::common::{ServerArgs, build_server_config};
///
/// let options = ServerArgs {
///     args: vec!["-y".to_string(), "@modelcontextprotocol/server-gdrive".to_string()],
///     env: vec!["TOKEN=abc".to_string()],
///     ..ServerArgs::default()
/// };
/// let (id, config) = build_server_config("npx", &options).unwrap();
///
/// assert_eq!(id.as_str(), "gdrive");
/// assert_eq!(config.args().len(), 2);
/// ```
pub fn build_server_config(command: &str, options: &ServerArgs) -> Result<(ServerId, ServerConfig)> {
    let mut builder = ServerConfig::builder()
        .command(command)
        .args(options.args.iter().cloned());

    for pair in &options.env {
        let (key, value) = parse_env_pair(pair)?;
        builder = builder.env(key, value);
    }

    if let Some(dir) = &options.cwd {
        builder = builder.cwd(dir.clone());
    }

    let config = builder
        .try_build()
        .with_context(|| format!("invalid server command '{command}'"))?;
    let server_id = resolve_server_id(options.name.as_deref(), &config)?;

    Ok((server_id, config))
}

/// Loads a named server from `mcp.json`.
///
/// The entry name becomes the server id unless `name` overrides it.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or has no such server.
pub fn load_from_config(
    entry: &str,
    mcp_json: Option<&Path>,
    name: Option<&str>,
) -> Result<(ServerId, ServerConfig)> {
    let file = McpServersFile::load(mcp_json).context("failed to load mcp.json")?;
    let config = file.server(entry)?.clone();
    let server_id = parse_server_id(name.unwrap_or(entry))?;

    tracing::debug!("Loaded server '{}' from mcp.json as '{}'", entry, server_id);
    Ok((server_id, config))
}

fn resolve_server_id(name: Option<&str>, config: &ServerConfig) -> Result<ServerId> {
    match name {
        Some(name) => Ok(parse_server_id(name)?),
        None => Ok(derive_server_id(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_server_config_docker() {
        let options = ServerArgs {
            args: vec![
                "run".to_string(),
                "-i".to_string(),
                "--rm".to_string(),
                "ghcr.io/github/github-mcp-server".to_string(),
            ],
            env: vec!["GITHUB_PERSONAL_ACCESS_TOKEN=ghp_xxx".to_string()],
            ..ServerArgs::default()
        };

        let (id, config) = build_server_config("docker", &options).unwrap();

        assert_eq!(id.as_str(), "github");
        assert_eq!(config.command(), "docker");
        assert_eq!(
            config.args(),
            &["run", "-i", "--rm", "ghcr.io/github/github-mcp-server"]
        );
        assert_eq!(
            config.env().get("GITHUB_PERSONAL_ACCESS_TOKEN"),
            Some(&"ghp_xxx".to_string())
        );
    }

    #[test]
    fn test_build_server_config_explicit_name_and_cwd() {
        let options = ServerArgs {
            cwd: Some(PathBuf::from("/tmp/workdir")),
            name: Some("docs".to_string()),
            ..ServerArgs::default()
        };

        let (id, config) = build_server_config("server", &options).unwrap();
        assert_eq!(id.as_str(), "docs");
        assert_eq!(config.cwd(), Some(&PathBuf::from("/tmp/workdir")));
    }

    #[test]
    fn test_build_server_config_invalid_env() {
        let options = ServerArgs {
            env: vec!["INVALID_FORMAT".to_string()],
            ..ServerArgs::default()
        };

        let err = build_server_config("server", &options).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_build_server_config_empty_command() {
        assert!(build_server_config("  ", &ServerArgs::default()).is_err());
    }

    #[test]
    fn test_load_from_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mcp.json");
        fs::write(
            &path,
            r#"{"mcpServers": {"gdrive": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-gdrive"]}}}"#,
        )
        .unwrap();

        let (id, config) = load_from_config("gdrive", Some(&path), None).unwrap();
        assert_eq!(id.as_str(), "gdrive");
        assert_eq!(config.command(), "npx");

        let (renamed, _) = load_from_config("gdrive", Some(&path), Some("drive")).unwrap();
        assert_eq!(renamed.as_str(), "drive");

        assert!(load_from_config("missing", Some(&path), None).is_err());
    }
}
