//! MCP server introspection and tool discovery.
//!
//! Connects to MCP servers, discovers their tools, normalizes each tool's
//! schema and records the result in a [`Registry`](mcp_toolgen_core::Registry).
//!
//! - [`ToolSource`]: where raw tool descriptors come from (a live stdio
//!   server, or a saved tool listing)
//! - [`Introspector`]: scans one or many sources, concurrently
//! - [`derive_server_id`]: default server id from a launch command

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod discovery;
pub mod server_id;
pub mod source;

pub use discovery::{Introspector, ScanOutcome};
pub use server_id::derive_server_id;
pub use source::{Discovery, StaticSource, StdioSource, ToolSource};
