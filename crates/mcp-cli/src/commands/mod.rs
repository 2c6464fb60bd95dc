//! Command implementations for the `mcp-toolgen` CLI.
//!
//! Each command parses its own arguments, runs the operation and formats
//! its summary according to the requested output format.

pub mod common;
pub mod completions;
pub mod generate;
pub mod introspect;
