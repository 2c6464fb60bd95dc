//! Output files for generated MCP tool modules.
//!
//! Code generation produces an [`OutputSet`]: an ordered list of files with
//! validated relative paths. Exporting a set writes it under an output
//! directory without ever silently replacing files someone edited.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_files::{ExportOptions, FilesBuilder};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let files = FilesBuilder::new()
//!     .add_file("google_drive/mod.rs", "pub mod client;\npub mod tools;\n")
//!     .add_file("google_drive/client.rs", "")
//!     .add_file("google_drive/tools.rs", "")
//!     .build()
//!     .unwrap();
//!
//! files.export_to(temp.path(), &ExportOptions::default()).unwrap();
//! assert!(temp.path().join("google_drive/tools.rs").exists());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod filesystem;
pub mod types;

pub use builder::{FilesBuilder, OutputSet, expand_tilde};
pub use filesystem::ExportOptions;
pub use types::{FileOutcome, OutputFile, OutputPath, WrittenFile};
