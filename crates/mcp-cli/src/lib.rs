//! Library side of the `mcp-toolgen` CLI.
//!
//! Commands and formatters live here so they can be tested without
//! spawning the binary.

#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod formatters;
