//! Generated bindings for the `gdrive` MCP server.
//!
//! Server: Google Drive
// Generated by mcp-toolgen. Do not edit.
#![allow(unused_imports, clippy::all, clippy::pedantic, clippy::nursery)]

pub mod client;
pub mod tools;

pub use client::Client;
pub use tools::get_document_;
pub use tools::share;
