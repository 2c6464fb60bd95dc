//! Session accessor for the `gdrive` tools.
// Generated by mcp-toolgen. Do not edit.
#![allow(dead_code, clippy::all, clippy::pedantic, clippy::nursery)]

use mcp_toolgen_core::serde_json::Value;
use mcp_toolgen_core::{Arguments, Result, SessionSlot, ToolSession};
use std::sync::Arc;

/// Handle every `gdrive` stub dispatches through.
///
/// Clones share one session slot. Install a session with
/// [`Client::set_session`] before calling any stub; until then every call
/// fails with `Error::SessionNotInitialized`.
#[derive(Debug, Clone, Default)]
pub struct Client {
    slot: SessionSlot,
}

impl Client {
    /// Creates a client with an empty session slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client over an existing slot, e.g. `Registry::session_slot()`.
    pub fn with_slot(slot: SessionSlot) -> Self {
        Self { slot }
    }

    /// Installs `session` and returns the one it replaced.
    pub fn set_session(&self, session: Arc<dyn ToolSession>) -> Option<Arc<dyn ToolSession>> {
        self.slot.set(session)
    }

    /// Returns the active session.
    pub fn get_session(&self) -> Result<Arc<dyn ToolSession>> {
        self.slot.require("get_session")
    }

    /// Removes the active session and returns it.
    pub fn clear_session(&self) -> Option<Arc<dyn ToolSession>> {
        self.slot.clear()
    }

    /// Returns `true` if a session is installed.
    pub fn has_session(&self) -> bool {
        self.slot.is_initialized()
    }

    /// Validates `arguments` against `input_schema` and calls `tool`.
    pub async fn call(&self, tool: &str, input_schema: &str, arguments: Arguments) -> Result<Value> {
        self.slot.call_checked(tool, input_schema, arguments).await
    }
}
