//! Types for generated output files.

use mcp_toolgen_core::{Error, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Relative, forward-slash path of a generated file.
///
/// Paths are relative to an output directory and may not escape it:
/// absolute paths, `..` segments and empty segments are rejected.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_files::OutputPath;
///
/// let path = OutputPath::new("google_drive/tools.rs").unwrap();
/// assert_eq!(path.as_str(), "google_drive/tools.rs");
///
/// assert!(OutputPath::new("../escape.rs").is_err());
/// assert!(OutputPath::new("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPath(String);

impl OutputPath {
    /// Validates and creates an output path.
    ///
    /// Backslashes are treated as separators and normalized to `/`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the path is empty, absolute, or
    /// contains `.`, `..` or empty segments.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();
        let normalized = raw.replace('\\', "/");

        let invalid = |reason: &str| Error::InvalidArgument(format!("output path '{raw}' {reason}"));

        if normalized.is_empty() {
            return Err(invalid("is empty"));
        }
        if normalized.starts_with('/') || Path::new(raw).has_root() {
            return Err(invalid("must be relative"));
        }
        for segment in normalized.split('/') {
            match segment {
                "" => return Err(invalid("has an empty segment")),
                "." | ".." => return Err(invalid("must not contain '.' or '..'")),
                _ => {}
            }
        }
        if Path::new(&normalized)
            .components()
            .any(|c| matches!(c, Component::Prefix(_)))
        {
            return Err(invalid("must be relative"));
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the path under `base`.
    #[must_use]
    pub fn to_disk_path(&self, base: &Path) -> PathBuf {
        self.0.split('/').fold(base.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Location relative to the output directory
    pub path: OutputPath,
    /// Full file content
    pub content: String,
}

/// What an export did to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file did not exist and was written.
    Created,
    /// The file existed with different content and was replaced.
    Updated,
    /// The file already had exactly this content; nothing was written.
    Unchanged,
}

impl FileOutcome {
    /// Returns `true` if the file on disk was modified.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// A file handled by an export, with its absolute location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Path on disk
    pub path: PathBuf,
    /// What happened to it
    pub outcome: FileOutcome,
}
