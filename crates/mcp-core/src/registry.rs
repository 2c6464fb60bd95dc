//! Process-level registry of discovered tools and the active session.
//!
//! The registry owns the tool catalog of every scanned server plus one
//! [`SessionSlot`]. It performs no network I/O: scanning happens elsewhere
//! and results are merged with [`Registry::record_scan`], which replaces a
//! server's entry atomically.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::registry::Registry;
//! use mcp_toolgen_core::schema::{normalize_tool, RawTool};
//! use mcp_toolgen_core::ServerId;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let server = ServerId::new("gdrive");
//! let tool = normalize_tool(&server, RawTool {
//!     name: "search".to_string(),
//!     description: None,
//!     input_schema: json!({"type": "object"}),
//! }).unwrap();
//!
//! registry.record(server, vec![tool]);
//! assert_eq!(registry.list_tools(), vec!["gdrive.search"]);
//! assert!(registry.get_tool_info("search").is_ok());
//! ```

use crate::schema::ToolDescriptor;
use crate::session::{Arguments, SessionSlot, ToolSession};
use crate::validate::validate_arguments;
use crate::{Error, Result, ServerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Tool that failed normalization during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedTool {
    /// Raw tool name (may be empty)
    pub name: String,
    /// Normalization error message
    pub reason: String,
}

/// Result of scanning one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCatalog {
    /// Identifier the server was recorded under
    pub server_id: ServerId,
    /// Name reported in the server handshake
    pub server_name: String,
    /// Version reported in the server handshake
    pub server_version: String,
    /// Successfully normalized tools in discovery order
    pub tools: Vec<ToolDescriptor>,
    /// Tools rejected by the normalizer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedTool>,
    /// When the scan completed
    pub scanned_at: DateTime<Utc>,
}

impl ServerCatalog {
    /// Creates a catalog with no handshake metadata.
    #[must_use]
    pub fn new(server_id: ServerId, tools: Vec<ToolDescriptor>) -> Self {
        Self {
            server_name: server_id.as_str().to_string(),
            server_id,
            server_version: String::new(),
            tools,
            rejected: Vec::new(),
            scanned_at: Utc::now(),
        }
    }
}

/// Catalog of discovered tools plus the active session.
///
/// Servers keep their first-recorded position; rescanning a server replaces
/// its tools in place.
#[derive(Debug, Default)]
pub struct Registry {
    catalog: RwLock<Vec<ServerCatalog>>,
    session: SessionSlot,
}

impl Registry {
    /// Creates an empty registry with an empty session slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the tools of `server_id`, replacing any previous entry.
    pub fn record(&self, server_id: ServerId, tools: Vec<ToolDescriptor>) {
        self.record_scan(ServerCatalog::new(server_id, tools));
    }

    /// Records a full scan result, replacing any previous entry.
    pub fn record_scan(&self, scan: ServerCatalog) {
        tracing::info!(
            "Recording {} tool(s) for server '{}' ({} rejected)",
            scan.tools.len(),
            scan.server_id,
            scan.rejected.len()
        );

        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        match catalog.iter_mut().find(|c| c.server_id == scan.server_id) {
            Some(existing) => *existing = scan,
            None => catalog.push(scan),
        }
    }

    /// Lists qualified tool names in discovery order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        self.read()
            .iter()
            .flat_map(|c| c.tools.iter().map(ToolDescriptor::qualified_name))
            .collect()
    }

    /// Returns the total number of recorded tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.read().iter().map(|c| c.tools.len()).sum()
    }

    /// Looks a tool up by qualified name, or by bare name if it is unique.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if nothing matches or a bare name is
    /// ambiguous across servers.
    pub fn get_tool_info(&self, name: &str) -> Result<ToolDescriptor> {
        let catalog = self.read();

        if let Some(tool) = catalog
            .iter()
            .flat_map(|c| c.tools.iter())
            .find(|t| t.qualified_name() == name)
        {
            return Ok(tool.clone());
        }

        let mut bare = catalog
            .iter()
            .flat_map(|c| c.tools.iter())
            .filter(|t| t.name.as_str() == name);

        match (bare.next(), bare.next()) {
            (Some(tool), None) => Ok(tool.clone()),
            (Some(_), Some(_)) => Err(Error::NotFound {
                resource: format!("tool:{name} (ambiguous, use server.tool)"),
            }),
            _ => Err(Error::NotFound {
                resource: format!("tool:{name}"),
            }),
        }
    }

    /// Returns a snapshot of every server catalog in first-record order.
    #[must_use]
    pub fn servers(&self) -> Vec<ServerCatalog> {
        self.read().clone()
    }

    /// Returns the catalog of one server.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the server was never recorded.
    pub fn server(&self, server_id: &ServerId) -> Result<ServerCatalog> {
        self.read()
            .iter()
            .find(|c| &c.server_id == server_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                resource: format!("server:{server_id}"),
            })
    }

    /// Returns the tools rejected during the last scan of a server.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the server was never recorded.
    pub fn rejected_tools(&self, server_id: &ServerId) -> Result<Vec<RejectedTool>> {
        self.server(server_id).map(|c| c.rejected)
    }

    /// Removes a server; returns `true` if it was present.
    pub fn remove_server(&self, server_id: &ServerId) -> bool {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        let before = catalog.len();
        catalog.retain(|c| &c.server_id != server_id);
        before != catalog.len()
    }

    /// Removes every server. The session is left untouched.
    pub fn clear(&self) {
        self.catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Installs the active session and returns the previous one.
    pub fn set_session(&self, session: Arc<dyn ToolSession>) -> Option<Arc<dyn ToolSession>> {
        tracing::debug!("Installing MCP session");
        self.session.set(session)
    }

    /// Returns a snapshot of the active session.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotInitialized` if no session is installed.
    pub fn get_session(&self) -> Result<Arc<dyn ToolSession>> {
        self.session.require("get_session")
    }

    /// Removes the active session and returns it.
    pub fn clear_session(&self) -> Option<Arc<dyn ToolSession>> {
        self.session.clear()
    }

    /// Returns the shared slot handed to generated clients.
    #[must_use]
    pub fn session_slot(&self) -> SessionSlot {
        self.session.clone()
    }

    /// Resolves `name`, validates `arguments` and dispatches the call.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound`, `Error::SessionNotInitialized` or
    /// `Error::InvalidArguments`; session errors pass through unchanged.
    pub async fn invoke(&self, name: &str, arguments: Arguments) -> Result<Value> {
        let tool = self.get_tool_info(name)?;
        let session = self.session.require(tool.name.as_str())?;
        validate_arguments(tool.name.as_str(), &tool.input_schema, arguments.as_map())?;
        session.call_tool(tool.name.as_str(), arguments.into_map()).await
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ServerCatalog>> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }
}
