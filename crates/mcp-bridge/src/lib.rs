//! MCP Bridge: stdio connections to real MCP servers.
//!
//! This crate wraps the official rmcp SDK for the two things the generator
//! needs from a live server:
//!
//! - discovery: launch a server, read its handshake and list its tools
//! - invocation: an [`RmcpSession`] that implements
//!   [`ToolSession`](mcp_toolgen_core::ToolSession), so it can be installed
//!   into a registry or a generated client
//!
//! # Examples
//!
//! ```no_run
//! use mcp_toolgen_bridge::McpConnection;
//! use mcp_toolgen_core::{Registry, ServerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder()
//!     .command("npx")
//!     .args(["-y", "@modelcontextprotocol/server-gdrive"])
//!     .try_build()?;
//!
//! let connection = McpConnection::connect("gdrive", &config).await?;
//! let tools = connection.list_tools().await?;
//! println!("{} exposes {} tools", connection.server_name(), tools.len());
//!
//! let registry = Registry::new();
//! registry.set_session(Arc::new(connection.into_session()));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

use async_trait::async_trait;
use mcp_toolgen_core::{Error, RawTool, Result, ServerConfig, ToolSession, validate_server_config};
use rmcp::model::CallToolRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

type Client = RunningService<RoleClient, ()>;

/// Running stdio connection to one MCP server.
pub struct McpConnection {
    label: String,
    client: Client,
}

impl fmt::Debug for McpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpConnection")
            .field("label", &self.label)
            .field("client", &"RunningService{..}")
            .finish()
    }
}

impl McpConnection {
    /// Launches the configured server and completes the MCP handshake.
    ///
    /// `label` is only used for logs and error messages.
    ///
    /// # Errors
    ///
    /// Returns `Error::SecurityViolation` if the configuration fails
    /// validation and `Error::ConnectionFailed` if the process cannot be
    /// spawned or the handshake fails.
    pub async fn connect(label: &str, config: &ServerConfig) -> Result<Self> {
        validate_server_config(config)?;

        tracing::info!("Connecting to MCP server '{}': {}", label, config.display_command());

        let command = tokio::process::Command::new(config.command()).configure(|cmd| {
            cmd.args(config.args());
            cmd.envs(config.env());
            if let Some(cwd) = config.cwd() {
                cmd.current_dir(cwd);
            }
        });

        let transport = TokioChildProcess::new(command).map_err(|e| Error::ConnectionFailed {
            server: label.to_string(),
            source: Box::new(e),
        })?;

        let client = ().serve(transport).await.map_err(|e| Error::ConnectionFailed {
            server: label.to_string(),
            source: Box::new(e),
        })?;

        tracing::debug!("Handshake with '{}' complete", label);

        Ok(Self {
            label: label.to_string(),
            client,
        })
    }

    /// Returns the label given at connect time.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the server name from the handshake, or the label.
    #[must_use]
    pub fn server_name(&self) -> String {
        self.client
            .peer_info()
            .map_or_else(|| self.label.clone(), |info| info.server_info.name.clone())
    }

    /// Returns the server version from the handshake, if reported.
    #[must_use]
    pub fn server_version(&self) -> String {
        self.client
            .peer_info()
            .map(|info| info.server_info.version.clone())
            .unwrap_or_default()
    }

    /// Lists every tool the server exposes, following pagination.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExecutionError` if the request fails.
    pub async fn list_tools(&self) -> Result<Vec<RawTool>> {
        let tools = self
            .client
            .list_all_tools()
            .await
            .map_err(|e| Error::ExecutionError {
                message: format!("Failed to list tools of '{}': {e}", self.label),
                source: Some(Box::new(e)),
            })?;

        tracing::debug!("Server '{}' listed {} tool(s)", self.label, tools.len());

        Ok(tools
            .into_iter()
            .map(|tool| RawTool {
                name: tool.name.into_owned(),
                description: tool.description.map(Cow::into_owned),
                input_schema: Value::Object(tool.input_schema.as_ref().clone()),
            })
            .collect())
    }

    /// Turns the connection into a session usable by generated clients.
    #[must_use]
    pub fn into_session(self) -> RmcpSession {
        RmcpSession {
            label: self.label,
            client: self.client,
        }
    }

    /// Shuts the server process down.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExecutionError` if the service task cannot be joined.
    pub async fn close(self) -> Result<()> {
        shutdown(&self.label, self.client).await
    }
}

/// [`ToolSession`] backed by a live rmcp client.
pub struct RmcpSession {
    label: String,
    client: Client,
}

impl fmt::Debug for RmcpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RmcpSession")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl RmcpSession {
    /// Shuts the server process down.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExecutionError` if the service task cannot be joined.
    pub async fn close(self) -> Result<()> {
        shutdown(&self.label, self.client).await
    }
}

#[async_trait]
impl ToolSession for RmcpSession {
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<Value> {
        tracing::debug!("Calling {}::{}", self.label, name);

        let result = self
            .client
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_owned()),
                arguments: Some(arguments),
            })
            .await
            .map_err(|e| Error::ExecutionError {
                message: format!("Tool call '{name}' failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let result = serde_json::to_value(&result)?;
        decode_tool_result(name, &result)
    }
}

async fn shutdown(label: &str, client: Client) -> Result<()> {
    tracing::debug!("Shutting down MCP server '{}'", label);
    client
        .cancel()
        .await
        .map(|_| ())
        .map_err(|e| Error::ExecutionError {
            message: format!("Failed to shut down '{label}': {e}"),
            source: Some(Box::new(e)),
        })
}

/// Converts a serialized `CallToolResult` into the value returned to stubs.
///
/// - `isError: true` becomes `Error::ToolCallFailed` carrying the text content
/// - `structuredContent` is returned as is when present
/// - a single text item is parsed as JSON when possible, else returned as a string
/// - several text items become an array of such values
/// - any other content list is returned unchanged
///
/// # Errors
///
/// Returns `Error::ToolCallFailed` when the server flagged the result as an error.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_bridge::decode_tool_result;
/// use serde_json::json;
///
/// let ok = json!({"content": [{"type": "text", "text": "{\"id\": 1}"}]});
/// assert_eq!(decode_tool_result("get", &ok).unwrap(), json!({"id": 1}));
///
/// let failed = json!({"content": [{"type": "text", "text": "boom"}], "isError": true});
/// assert!(decode_tool_result("get", &failed).is_err());
/// ```
pub fn decode_tool_result(tool: &str, result: &Value) -> Result<Value> {
    let content = result
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let texts: Option<Vec<&str>> = content
        .iter()
        .map(|item| match item.get("type").and_then(Value::as_str) {
            Some("text") => item.get("text").and_then(Value::as_str),
            _ => None,
        })
        .collect();

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let message = texts.map_or_else(
            || Value::from(content.to_vec()).to_string(),
            |texts| texts.join("\n"),
        );
        return Err(Error::ToolCallFailed {
            tool: tool.to_string(),
            message,
        });
    }

    if let Some(structured) = result.get("structuredContent").filter(|v| !v.is_null()) {
        return Ok(structured.clone());
    }

    Ok(match texts {
        Some(texts) if texts.len() == 1 => parse_text(texts[0]),
        Some(texts) if !texts.is_empty() => {
            Value::Array(texts.into_iter().map(parse_text).collect())
        }
        _ => Value::Array(content.to_vec()),
    })
}

fn parse_text(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
