//! MCP server launch configuration with command, arguments, and environment.
//!
//! Servers are launched as child processes and spoken to over stdio. The
//! configuration is validated before launch so that a config file cannot be
//! used to smuggle shell syntax or loader hijacks into the child.
//!
//! # Security
//!
//! [`validate_server_config`] enforces:
//! - Non-empty command without shell metacharacters
//! - Arguments without NUL bytes or line breaks
//! - Environment names that are plain identifiers
//! - Forbidden env vars: `LD_PRELOAD`, `LD_LIBRARY_PATH`, `DYLD_*`, `PATH`
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::{ServerConfig, validate_server_config};
//!
//! let config = ServerConfig::builder()
//!     .command("npx")
//!     .arg("-y")
//!     .arg("@modelcontextprotocol/server-gdrive")
//!     .env("LOG_LEVEL", "debug")
//!     .try_build()
//!     .unwrap();
//!
//! assert!(validate_server_config(&config).is_ok());
//! assert_eq!(config.display_command(), "npx -y @modelcontextprotocol/server-gdrive");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Shell metacharacters rejected in the command.
const FORBIDDEN_CHARS: &[char] = &[';', '|', '&', '>', '<', '`', '$', '(', ')', '\n', '\r'];

/// Environment variables that can hijack the child's loader or lookup path.
const FORBIDDEN_ENV: &[&str] = &["LD_PRELOAD", "LD_LIBRARY_PATH", "LD_AUDIT", "PATH"];

/// MCP server launch configuration.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .command("docker")
///     .args(["run", "-i", "--rm", "mcp/github"])
///     .try_build()
///     .unwrap();
///
/// assert_eq!(config.command(), "docker");
/// assert_eq!(config.args().len(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Command to execute (binary name resolved via `PATH`, or a path).
    pub command: String,

    /// Arguments passed to the command, one by one, without a shell.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variables added to the inherited environment.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Working directory for the child; inherited when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl ServerConfig {
    /// Creates a new builder for `ServerConfig`.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the command as a string slice.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns a slice of arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns a reference to the environment variables map.
    #[must_use]
    pub const fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub const fn cwd(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// Returns the command line joined with spaces, for logs and labels.
    #[must_use]
    pub fn display_command(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for constructing `ServerConfig` instances.
#[derive(Debug, Default, Clone)]
pub struct ServerConfigBuilder {
    command: Option<String>,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Sets the command to execute.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets all arguments at once, replacing any previously added.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a single environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets all environment variables at once, replacing any previously added.
    #[must_use]
    pub fn environment(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Sets the working directory for the child process.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Attempts to build the `ServerConfig`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the command is missing or blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::ServerConfig;
    ///
    /// assert!(ServerConfig::builder().try_build().is_err());
    /// assert!(ServerConfig::builder().command("uvx").try_build().is_ok());
    /// ```
    pub fn try_build(self) -> Result<ServerConfig> {
        let command = self.command.ok_or_else(|| Error::ConfigError {
            message: "command is required".to_string(),
        })?;

        if command.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "command cannot be empty".to_string(),
            });
        }

        Ok(ServerConfig {
            command,
            args: self.args,
            env: self.env,
            cwd: self.cwd,
        })
    }
}

/// Validates a server configuration before launching it.
///
/// # Errors
///
/// Returns `Error::SecurityViolation` describing the first problem found.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::{ServerConfig, validate_server_config};
///
/// let bad = ServerConfig::builder()
///     .command("server; rm -rf /")
///     .try_build()
///     .unwrap();
/// assert!(validate_server_config(&bad).unwrap_err().is_security_error());
/// ```
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    let command = config.command.trim();
    if command.is_empty() {
        return Err(Error::SecurityViolation {
            reason: "Command cannot be empty".into(),
        });
    }

    if let Some(forbidden) = command.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(Error::SecurityViolation {
            reason: format!("Command contains forbidden shell metacharacter: '{forbidden}'"),
        });
    }

    for arg in &config.args {
        if arg.contains(['\0', '\n', '\r']) {
            return Err(Error::SecurityViolation {
                reason: format!("Argument contains a control character: {arg:?}"),
            });
        }
    }

    for key in config.env.keys() {
        validate_env_name(key)?;
    }

    Ok(())
}

fn validate_env_name(key: &str) -> Result<()> {
    let well_formed = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !well_formed {
        return Err(Error::SecurityViolation {
            reason: format!("Invalid environment variable name: {key:?}"),
        });
    }

    let upper = key.to_ascii_uppercase();
    if FORBIDDEN_ENV.contains(&upper.as_str()) || upper.starts_with("DYLD_") {
        return Err(Error::SecurityViolation {
            reason: format!("Environment variable '{key}' is not allowed"),
        });
    }

    Ok(())
}
