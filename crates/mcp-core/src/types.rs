//! Strong domain types for MCP tool generation.
//!
//! Newtypes keep server identifiers and raw tool names from being mixed up
//! with each other or with the derived Rust identifiers produced later.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::{ServerId, ToolName};
//!
//! let server = ServerId::new("gdrive");
//! let tool = ToolName::new("get-document!");
//! assert_eq!(server.qualify(&tool), "gdrive.get-document!");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between server id and tool name in qualified names.
pub const QUALIFIED_SEPARATOR: char = '.';

/// Server identifier (newtype over String).
///
/// Identifies one scanned MCP server inside the registry. The id is chosen
/// by the caller or derived from the launch command; it is not sanitized, so
/// it may contain characters that are invalid in Rust identifiers.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::ServerId;
///
/// let id = ServerId::new("google-drive");
/// assert_eq!(id.as_str(), "google-drive");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerId(String);

impl ServerId {
    /// Creates a new server identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the server ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ServerId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Builds the server-qualified name of a tool.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::{ServerId, ToolName};
    ///
    /// let id = ServerId::new("github");
    /// assert_eq!(id.qualify(&ToolName::new("create_issue")), "github.create_issue");
    /// ```
    #[must_use]
    pub fn qualify(&self, tool: &ToolName) -> String {
        format!("{}{QUALIFIED_SEPARATOR}{}", self.0, tool.as_str())
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Raw tool name as reported by the MCP server (newtype over String).
///
/// This is the name used on the wire when the tool is invoked. It is never
/// rewritten; derived function names live in `GeneratedSymbol`.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::ToolName;
///
/// let tool = ToolName::new("list-files");
/// assert_eq!(tool.as_str(), "list-files");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tool name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ToolName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToolName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToolName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_id_creation() {
        let id = ServerId::new("test-server");
        assert_eq!(id.as_str(), "test-server");
    }

    #[test]
    fn test_server_id_display() {
        let id = ServerId::new("display-test");
        assert_eq!(format!("{id}"), "display-test");
    }

    #[test]
    fn test_server_id_into_inner() {
        let id = ServerId::new("test");
        assert_eq!(id.into_inner(), "test");
    }

    #[test]
    fn test_tool_name_keeps_raw_form() {
        let name = ToolName::from("get-document!");
        assert_eq!(name.as_str(), "get-document!");
        assert_eq!(name.to_string(), "get-document!");
    }

    #[test]
    fn test_qualify() {
        let id = ServerId::new("gdrive");
        let tool = ToolName::new("search");
        assert_eq!(id.qualify(&tool), "gdrive.search");
    }

    #[test]
    fn test_ordering_is_lexical() {
        let mut ids = vec![ServerId::new("b"), ServerId::new("a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }
}
