//! Generator configuration files.
//!
//! Two formats are understood:
//!
//! - the generator's own TOML file (default location
//!   `~/.config/mcp-toolgen/config.toml`), with an `[output]` table and one
//!   `[servers.<id>]` table per server;
//! - the Claude-style `~/.claude/mcp.json` file, whose `mcpServers` map is
//!   used by `--from-config`.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::config::GeneratorConfig;
//!
//! let config = GeneratorConfig::from_toml_str(r#"
//! [output]
//! dir = "./stubs"
//! overwrite = true
//!
//! [servers.github]
//! command = "docker"
//! args = ["run", "-i", "--rm", "ghcr.io/github/github-mcp-server"]
//! env = { GITHUB_PERSONAL_ACCESS_TOKEN = "ghp_xxx" }
//! "#).unwrap();
//!
//! assert!(config.output.overwrite);
//! assert_eq!(config.servers["github"].command(), "docker");
//! ```

use crate::{Error, Result, ServerConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config dir.
const APP_DIR: &str = "mcp-toolgen";

/// Default output directory for generated modules.
pub const DEFAULT_OUTPUT_DIR: &str = "./generated_servers";

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for generated modules
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Whether divergent existing files may be replaced
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            overwrite: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Generator configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Servers to scan, keyed by server id
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
}

impl GeneratorConfig {
    /// Returns the default config file path, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid generator config: {e}"),
        })
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigError` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading generator config from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Same as [`GeneratorConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize generator config: {e}"),
        })
    }
}

/// Claude-style `mcp.json` file with an `mcpServers` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServersFile {
    /// Servers keyed by name
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, ServerConfig>,
}

impl McpServersFile {
    /// Returns `~/.claude/mcp.json`, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".claude").join("mcp.json"))
    }

    /// Parses the file contents.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the JSON does not match the format.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::config::McpServersFile;
    ///
    /// let file = McpServersFile::from_json_str(r#"{
    ///   "mcpServers": {
    ///     "gdrive": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-gdrive"]}
    ///   }
    /// }"#).unwrap();
    ///
    /// assert_eq!(file.server("gdrive").unwrap().args().len(), 2);
    /// assert!(file.server("missing").unwrap_err().is_not_found());
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid mcp.json: {e}"),
        })
    }

    /// Loads the file at `path`, or at the default location.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if no path is known, `Error::Io` if the
    /// file cannot be read, or a parse error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or_else(|| Error::ConfigError {
                message: "cannot determine home directory for ~/.claude/mcp.json".to_string(),
            })?,
        };

        tracing::debug!("Loading MCP server list from {}", path.display());
        let text = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Returns the configuration of a named server.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no server has that name.
    pub fn server(&self, name: &str) -> Result<&ServerConfig> {
        self.mcp_servers.get(name).ok_or_else(|| Error::NotFound {
            resource: format!("server '{name}' in mcp.json"),
        })
    }
}
