//! Builder for output file sets.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_files::FilesBuilder;
//!
//! let files = FilesBuilder::new()
//!     .add_file("gdrive/mod.rs", "pub mod tools;\n")
//!     .add_file("gdrive/tools.rs", "")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(files.len(), 2);
//! ```

use crate::types::{OutputFile, OutputPath};
use mcp_toolgen_core::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ordered set of generated files, ready for export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    files: Vec<OutputFile>,
}

impl OutputSet {
    /// Returns the files in insertion order.
    #[must_use]
    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    /// Looks up a file by relative path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }

    /// Returns the number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the set holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consumes the set and returns its files.
    #[must_use]
    pub fn into_files(self) -> Vec<OutputFile> {
        self.files
    }
}

/// Collects files for an [`OutputSet`].
///
/// Invalid or duplicate paths are remembered and reported by
/// [`build`](Self::build), so calls can be chained.
#[derive(Debug, Default)]
pub struct FilesBuilder {
    files: Vec<OutputFile>,
    seen: HashSet<OutputPath>,
    errors: Vec<Error>,
}

impl FilesBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_files::FilesBuilder;
    ///
    /// let result = FilesBuilder::new()
    ///     .add_file("a.rs", "")
    ///     .add_file("a.rs", "again")
    ///     .build();
    /// assert!(result.is_err());
    /// ```
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        match OutputPath::new(path) {
            Ok(path) if self.seen.contains(&path) => {
                self.errors.push(Error::InvalidArgument(format!(
                    "output path '{path}' added twice"
                )));
            }
            Ok(path) => {
                self.seen.insert(path.clone());
                self.files.push(OutputFile {
                    path,
                    content: content.into(),
                });
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Adds every `(path, content)` pair.
    #[must_use]
    pub fn add_files<P, C>(self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        files
            .into_iter()
            .fold(self, |builder, (path, content)| builder.add_file(path, content))
    }

    /// Returns the number of files accepted so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Finishes the set.
    ///
    /// # Errors
    ///
    /// Returns the first invalid or duplicate path encountered.
    pub fn build(self) -> Result<OutputSet> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(OutputSet { files: self.files })
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// # Errors
///
/// Returns `Error::ConfigError` if the path starts with `~` and the home
/// directory cannot be determined.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_files::expand_tilde;
/// use std::path::Path;
///
/// assert_eq!(expand_tilde(Path::new("./out")).unwrap(), Path::new("./out"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    let rest = match text {
        "~" => "",
        _ => match text.strip_prefix("~/") {
            Some(rest) => rest,
            None => return Ok(path.to_path_buf()),
        },
    };

    let home = dirs::home_dir().ok_or_else(|| Error::ConfigError {
        message: format!("cannot expand '{text}': home directory unknown"),
    })?;

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_insertion_order() {
        let set = FilesBuilder::new()
            .add_files([("m/mod.rs", "a"), ("m/client.rs", "b"), ("m/tools.rs", "c")])
            .build()
            .unwrap();

        let paths: Vec<_> = set.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["m/mod.rs", "m/client.rs", "m/tools.rs"]);
        assert_eq!(set.get("m/client.rs").unwrap().content, "b");
        assert!(set.get("m/missing.rs").is_none());
    }

    #[test]
    fn test_builder_reports_invalid_path() {
        let builder = FilesBuilder::new()
            .add_file("ok.rs", "")
            .add_file("../bad.rs", "");
        assert_eq!(builder.file_count(), 1);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_empty_builder() {
        let set = FilesBuilder::new().build().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(
            expand_tilde(Path::new("/tmp/out")).unwrap(),
            PathBuf::from("/tmp/out")
        );
        assert_eq!(
            expand_tilde(Path::new("~user/out")).unwrap(),
            PathBuf::from("~user/out")
        );
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/gen")).unwrap(), home.join("gen"));
            assert_eq!(expand_tilde(Path::new("~")).unwrap(), home);
        }
    }
}
