//! Core types, schema normalization and session handling for MCP tool
//! generation.
//!
//! This crate provides the foundational types used by every other crate in
//! the workspace, and it is the only runtime dependency of the Rust modules
//! the generator emits.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`ServerId`, `ToolName`)
//! - Error hierarchy with contextual information
//! - Schema normalizer and argument validator
//! - Registry of discovered tools and the session slot
//! - Server launch and generator configuration
//!
//! Generated code reaches `serde` and `serde_json` through the re-exports
//! below so that it needs no extra entries in the consumer's `Cargo.toml`.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod server_config;
mod types;

pub mod cli;
pub mod config;
pub mod registry;
pub mod schema;
pub mod session;
pub mod validate;

pub use error::{Error, Result};
pub use registry::{Registry, RejectedTool, ServerCatalog};
pub use schema::{
    InputSchema, ParameterSpec, PrimitiveType, RawTool, SchemaKind, ToolDescriptor,
    normalize_tool,
};
pub use server_config::{ServerConfig, ServerConfigBuilder, validate_server_config};
pub use session::{Arguments, SessionSlot, ToolSession};
pub use types::{QUALIFIED_SEPARATOR, ServerId, ToolName};

pub use serde;
pub use serde_json;
