//! Sources of raw tool descriptors.

use async_trait::async_trait;
use mcp_toolgen_bridge::McpConnection;
use mcp_toolgen_core::{Error, RawTool, Result, ServerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a source reported during discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    /// Server name from the handshake
    pub server_name: String,
    /// Server version from the handshake
    #[serde(default)]
    pub server_version: String,
    /// Raw tool descriptors in the order the server listed them
    pub tools: Vec<RawTool>,
}

/// Provides raw tool descriptors for one server.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Short human-readable description used in logs.
    fn label(&self) -> String;

    /// Performs discovery.
    ///
    /// # Errors
    ///
    /// Returns connection or transport errors; these are fatal to the
    /// server being scanned, never to other servers.
    async fn discover(&self) -> Result<Discovery>;
}

/// Launches a server over stdio, lists its tools, and shuts it down.
#[derive(Debug, Clone)]
pub struct StdioSource {
    config: ServerConfig,
}

impl StdioSource {
    /// Creates a source for the given launch configuration.
    #[must_use]
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Returns the launch configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[async_trait]
impl ToolSource for StdioSource {
    fn label(&self) -> String {
        self.config.display_command()
    }

    async fn discover(&self) -> Result<Discovery> {
        let connection = McpConnection::connect(&self.label(), &self.config).await?;

        let listed = connection.list_tools().await;
        let discovery = listed.map(|tools| Discovery {
            server_name: connection.server_name(),
            server_version: connection.server_version(),
            tools,
        });

        if let Err(e) = connection.close().await {
            tracing::warn!("{}", e);
        }

        discovery
    }
}

/// Tool entry of a `tools/list` result.
#[derive(Deserialize)]
struct WireTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "inputSchema")]
    input_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct WireListing {
    tools: Vec<WireTool>,
}

/// Serves a fixed tool listing, e.g. one saved with `introspect --format json`.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_introspector::{StaticSource, ToolSource};
/// use mcp_toolgen_core::RawTool;
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let source = StaticSource::new("demo", vec![RawTool {
///     name: "echo".to_string(),
///     description: None,
///     input_schema: json!({"type": "object"}),
/// }]);
///
/// let discovery = source.discover().await.unwrap();
/// assert_eq!(discovery.tools.len(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct StaticSource {
    discovery: Discovery,
}

impl StaticSource {
    /// Creates a source from an in-memory listing.
    #[must_use]
    pub fn new(server_name: impl Into<String>, tools: Vec<RawTool>) -> Self {
        Self {
            discovery: Discovery {
                server_name: server_name.into(),
                server_version: String::new(),
                tools,
            },
        }
    }

    /// Loads a listing from JSON.
    ///
    /// Accepts either a [`Discovery`] object or a bare `tools/list` result
    /// (`{"tools": [...]}`), whose tools use the wire field `inputSchema`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigError` if it has neither shape.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let fallback_name = path
            .file_stem()
            .map_or_else(|| "server".to_string(), |s| s.to_string_lossy().into_owned());

        Self::from_json_str(&text, &fallback_name)
    }

    /// Parses a listing from JSON text; see [`StaticSource::from_json_file`].
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text has neither accepted shape.
    pub fn from_json_str(text: &str, fallback_name: &str) -> Result<Self> {
        if let Ok(discovery) = serde_json::from_str::<Discovery>(text) {
            return Ok(Self { discovery });
        }

        let listing: WireListing = serde_json::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid tool listing: {e}"),
        })?;

        Ok(Self::new(
            fallback_name,
            listing
                .tools
                .into_iter()
                .map(|t| RawTool {
                    name: t.name,
                    description: t.description,
                    input_schema: t.input_schema,
                })
                .collect(),
        ))
    }
}

#[async_trait]
impl ToolSource for StaticSource {
    fn label(&self) -> String {
        format!("static:{}", self.discovery.server_name)
    }

    async fn discover(&self) -> Result<Discovery> {
        Ok(self.discovery.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_wire_listing() {
        let source = StaticSource::from_json_str(
            r#"{"tools": [{"name": "search", "inputSchema": {"type": "object"}}]}"#,
            "files",
        )
        .unwrap();

        assert_eq!(source.label(), "static:files");
        assert_eq!(source.discovery.tools[0].name, "search");
    }

    #[test]
    fn test_static_source_discovery_shape() {
        let source = StaticSource::from_json_str(
            r#"{"server_name": "gdrive", "server_version": "1.2.0",
                "tools": [{"name": "search", "description": null, "input_schema": {}}]}"#,
            "ignored",
        )
        .unwrap();

        assert_eq!(source.discovery.server_name, "gdrive");
        assert_eq!(source.discovery.server_version, "1.2.0");
    }

    #[test]
    fn test_static_source_rejects_garbage() {
        let err = StaticSource::from_json_str("[1, 2]", "x").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_stdio_source_label() {
        let config = ServerConfig::builder()
            .command("uvx")
            .arg("mcp-server-fetch")
            .try_build()
            .unwrap();
        assert_eq!(StdioSource::new(config).label(), "uvx mcp-server-fetch");
    }
}
