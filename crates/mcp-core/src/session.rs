//! Session abstraction shared by the registry and generated clients.
//!
//! A [`ToolSession`] is anything that can invoke a tool by its raw name. The
//! [`SessionSlot`] is the explicit context object that holds the active
//! session: it is cheap to clone, every clone sees the same session, and the
//! session can be replaced at any time without disturbing in-flight calls.
//!
//! # Examples
//!
//! ```
//! use async_trait::async_trait;
//! use mcp_toolgen_core::session::{Arguments, SessionSlot, ToolSession};
//! use mcp_toolgen_core::Result;
//! use serde_json::{Map, Value, json};
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ToolSession for Echo {
//!     async fn call_tool(&self, _name: &str, arguments: Map<String, Value>) -> Result<Value> {
//!         Ok(Value::Object(arguments))
//!     }
//! }
//!
//! # tokio_test_block(async {
//! let slot = SessionSlot::new();
//! slot.set(Arc::new(Echo));
//!
//! let args = Arguments::new().required("query", "rust").unwrap();
//! let result = slot.call("search", args).await.unwrap();
//! assert_eq!(result, json!({"query": "rust"}));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use crate::schema::normalize_input_schema;
use crate::validate::validate_arguments;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Invokes MCP tools on a connected server.
///
/// Implementations must be `Send + Sync`; the session is shared between
/// every generated client and may be called from many tasks at once.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Calls the tool with its raw (server-side) name.
    ///
    /// # Errors
    ///
    /// Implementations return `Error::ToolCallFailed` when the server reports
    /// a tool error and `Error::ExecutionError` for transport failures.
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<Value>;
}

/// Argument map built by generated stubs.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::session::Arguments;
///
/// let args = Arguments::new()
///     .required("document_id", "abc")
///     .unwrap()
///     .optional("fields", None::<String>)
///     .unwrap();
///
/// assert_eq!(args.len(), 1);
/// assert!(args.get("fields").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Creates an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required argument.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if the value cannot be serialized.
    pub fn required<T: Serialize>(mut self, key: &str, value: T) -> Result<Self> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Adds an optional argument; `None` leaves the key out entirely.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if the value cannot be serialized.
    pub fn optional<T: Serialize>(self, key: &str, value: Option<T>) -> Result<Self> {
        match value {
            Some(value) => self.required(key, value),
            None => Ok(self),
        }
    }

    /// Inserts an already serialized value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrows the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consumes the builder and returns the JSON map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Shared, atomically replaceable holder of the active session.
///
/// Readers take a snapshot (`Arc` clone) under a short read lock and release
/// the lock before awaiting. A call that is cancelled mid-flight therefore
/// only drops its own snapshot, and a call started after [`set`](Self::set)
/// always sees the new session.
#[derive(Clone, Default)]
pub struct SessionSlot {
    inner: Arc<RwLock<Option<Arc<dyn ToolSession>>>>,
}

impl SessionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `session` and returns the previous one, if any.
    pub fn set(&self, session: Arc<dyn ToolSession>) -> Option<Arc<dyn ToolSession>> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(session)
    }

    /// Removes the active session and returns it.
    pub fn clear(&self) -> Option<Arc<dyn ToolSession>> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.take()
    }

    /// Returns a snapshot of the active session, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<dyn ToolSession>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if a session is installed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns a snapshot of the session needed to invoke `tool`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotInitialized` if the slot is empty.
    pub fn require(&self, tool: &str) -> Result<Arc<dyn ToolSession>> {
        self.snapshot().ok_or_else(|| Error::SessionNotInitialized {
            tool: tool.to_string(),
        })
    }

    /// Dispatches `tool` without validating its arguments.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotInitialized` if the slot is empty; session
    /// errors are passed through unchanged.
    pub async fn call(&self, tool: &str, arguments: Arguments) -> Result<Value> {
        let session = self.require(tool)?;
        tracing::debug!("Calling tool '{}' with {} argument(s)", tool, arguments.len());
        session.call_tool(tool, arguments.into_map()).await
    }

    /// Validates `arguments` against the JSON `input_schema` and dispatches.
    ///
    /// This is the entry point used by generated stubs, which embed their
    /// input schema as a string constant.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotInitialized` if the slot is empty,
    /// `Error::InvalidArguments` if validation fails, and passes session
    /// errors through unchanged.
    pub async fn call_checked(
        &self,
        tool: &str,
        input_schema: &str,
        arguments: Arguments,
    ) -> Result<Value> {
        let session = self.require(tool)?;

        let schema: Value = serde_json::from_str(input_schema)?;
        let schema = normalize_input_schema(tool, &schema)?;
        validate_arguments(tool, &schema, arguments.as_map())?;

        tracing::debug!("Calling tool '{}' with {} argument(s)", tool, arguments.len());
        session.call_tool(tool, arguments.into_map()).await
    }
}

impl fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSlot")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
