//! Typed Rust stub generation for MCP tools.
//!
//! Turns normalized tool catalogs into one Rust module per server: a
//! `Client` holding the shared session and one async function per tool
//! with typed parameters. Modules are rendered with Handlebars templates
//! and checked with `syn` before they are written.
//!
//! The pipeline per server is:
//!
//! 1. [`identifiers`] derives collision-free module, function and
//!    parameter names
//! 2. [`translator`] maps parameter schemas to [`translator::TypeAnnotation`]s
//! 3. [`rust_types`] spells annotations as Rust types and collects the
//!    generated structs and enums
//! 4. [`emitter`] renders the templates and writes the files
//!
//! [`ToolGenerator`] drives the whole pipeline from discovery to disk.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod emitter;
pub mod generator;
pub mod identifiers;
pub mod plan;
pub mod report;
pub mod rust_types;
pub mod template_engine;
pub mod translator;

pub use emitter::{CodeEmitter, GenerateOptions};
pub use generator::{ToolGenerator, ToolInfo};
pub use identifiers::{GeneratedSymbol, IdentifierMapper};
pub use plan::{EmissionPlan, ServerPlan, StubPlan};
pub use report::{GenerationReport, GenerationStage, ServerFailure, ServerReport};
pub use translator::TypeAnnotation;
