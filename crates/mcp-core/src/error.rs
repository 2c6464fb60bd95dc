//! Error types for MCP tool generation.
//!
//! A single error hierarchy is shared by every crate in the workspace. The
//! variants follow the generation taxonomy: schema problems are local to a
//! tool, naming and catalog problems are fatal to a server, write-policy
//! violations abort the server's output set, and runtime misuse of a
//! generated stub is fatal to that call only.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::{Error, Result};
//!
//! fn require_name(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(Error::SchemaError {
//!             tool: name.to_string(),
//!             reason: "tool name is empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_name("  ").unwrap_err();
//! assert!(err.is_schema_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for MCP tool generation.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool descriptor is missing a name or carries a malformed or
    /// unsupported schema node.
    ///
    /// Aborts generation of that tool only.
    #[error("Invalid schema for tool '{tool}': {reason}")]
    SchemaError {
        /// Raw tool name (may be empty when the name itself is missing)
        tool: String,
        /// What was wrong with the descriptor
        reason: String,
    },

    /// Deterministic suffixing ran past its bound.
    ///
    /// Aborts emission of the whole server.
    #[error("Name collision limit ({limit}) exhausted for '{name}' in namespace '{namespace}'")]
    NameCollisionExhausted {
        /// Namespace in which the collision happened (usually a server id)
        namespace: String,
        /// Base name that could not be made unique
        name: String,
        /// Highest suffix that was tried
        limit: usize,
    },

    /// Requested tool, server or file is unknown.
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// A generated stub was invoked before a session was installed.
    #[error("No MCP session installed; call set_session before invoking '{tool}'")]
    SessionNotInitialized {
        /// Tool the caller tried to invoke
        tool: String,
    },

    /// A target file exists with different content and overwriting is off.
    #[error("Refusing to overwrite divergent file: {}", path.display())]
    OutputConflict {
        /// File that would have been overwritten
        path: PathBuf,
    },

    /// Arguments passed to a tool do not satisfy its input schema.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Tool being invoked
        tool: String,
        /// First validation failure found
        reason: String,
    },

    /// Rendering or syntax validation of generated code failed.
    #[error("Code generation failed for '{target}': {message}")]
    CodeGeneration {
        /// Server or file that failed to render
        target: String,
        /// Description of the failure
        message: String,
    },

    /// MCP server connection failed.
    #[error("MCP server connection failed: {server}")]
    ConnectionFailed {
        /// Name or identifier of the server that failed to connect
        server: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport-level failure while talking to a connected server.
    #[error("Execution error: {message}")]
    ExecutionError {
        /// Description of the failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server reported an error result for a tool call.
    #[error("Tool '{tool}' reported an error: {message}")]
    ToolCallFailed {
        /// Tool that failed
        tool: String,
        /// Error payload returned by the server
        message: String,
    },

    /// Security policy violation (unsafe command or environment).
    #[error("Security policy violation: {reason}")]
    SecurityViolation {
        /// Description of the violation
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Filesystem error with the path it happened on.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a schema error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::Error;
    ///
    /// let err = Error::SchemaError {
    ///     tool: "broken".to_string(),
    ///     reason: "input schema is not an object".to_string(),
    /// };
    /// assert!(err.is_schema_error());
    /// ```
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::SchemaError { .. })
    }

    /// Returns `true` if suffixing ran out of room.
    #[must_use]
    pub const fn is_name_collision(&self) -> bool {
        matches!(self, Self::NameCollisionExhausted { .. })
    }

    /// Returns `true` if this is a not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::Error;
    ///
    /// let err = Error::NotFound {
    ///     resource: "tool:gdrive.search".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if a stub ran without a session.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::Error;
    ///
    /// let err = Error::SessionNotInitialized {
    ///     tool: "get-document!".to_string(),
    /// };
    /// assert!(err.is_session_not_initialized());
    /// ```
    #[must_use]
    pub const fn is_session_not_initialized(&self) -> bool {
        matches!(self, Self::SessionNotInitialized { .. })
    }

    /// Returns `true` if the write policy refused to touch a file.
    #[must_use]
    pub const fn is_output_conflict(&self) -> bool {
        matches!(self, Self::OutputConflict { .. })
    }

    /// Returns `true` if tool arguments failed validation.
    #[must_use]
    pub const fn is_invalid_arguments(&self) -> bool {
        matches!(self, Self::InvalidArguments { .. })
    }

    /// Returns `true` if this is a connection error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::Error;
    ///
    /// let err = Error::ConnectionFailed {
    ///     server: "test".to_string(),
    ///     source: "connection refused".into(),
    /// };
    /// assert!(err.is_connection_error());
    /// ```
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    /// Returns `true` if this is a security violation error.
    #[must_use]
    pub const fn is_security_error(&self) -> bool {
        matches!(self, Self::SecurityViolation { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if rendering or validating generated code failed.
    #[must_use]
    pub const fn is_code_generation_error(&self) -> bool {
        matches!(self, Self::CodeGeneration { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::SerializationError {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Result type alias for MCP tool generation.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::{Result, Error};
///
/// fn validate_limit(value: usize) -> Result<usize> {
///     if value == 0 {
///         return Err(Error::ConfigError {
///             message: "limit must be positive".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(validate_limit(5).is_ok());
/// assert!(validate_limit(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
