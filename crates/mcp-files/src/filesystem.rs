//! Exporting output sets to disk.
//!
//! An export runs in three phases:
//!
//! 1. **Preflight**: compare every target with what is already on disk.
//!    Identical files become [`FileOutcome::Unchanged`]; a divergent file
//!    with overwriting disabled aborts the export before anything is
//!    written.
//! 2. **Directories**: create every needed directory in one pass.
//! 3. **Writes**: write changed files, atomically by default (temp file in
//!    the same directory, then rename).
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_files::{ExportOptions, FileOutcome, FilesBuilder};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # let out = temp.path();
//! let files = FilesBuilder::new()
//!     .add_file("gdrive/mod.rs", "pub mod tools;\n")
//!     .build()
//!     .unwrap();
//!
//! let first = files.export_to(out, &ExportOptions::default()).unwrap();
//! assert_eq!(first[0].outcome, FileOutcome::Created);
//!
//! let second = files.export_to(out, &ExportOptions::default()).unwrap();
//! assert_eq!(second[0].outcome, FileOutcome::Unchanged);
//! ```

use crate::builder::OutputSet;
use crate::types::{FileOutcome, OutputFile, WrittenFile};
use mcp_toolgen_core::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Options for export operations.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_files::ExportOptions;
///
/// let options = ExportOptions::default().with_overwrite(true);
/// assert!(options.atomic);
/// assert!(options.overwrite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write through a temp file and rename it into place
    pub atomic: bool,
    /// Replace existing files whose content differs
    pub overwrite: bool,
}

impl ExportOptions {
    /// Creates options with defaults: atomic writes, no overwriting.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            atomic: true,
            overwrite: false,
        }
    }

    /// Sets whether to use atomic writes.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Sets whether divergent files may be replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct Planned<'a> {
    file: &'a OutputFile,
    disk_path: PathBuf,
    outcome: FileOutcome,
}

impl OutputSet {
    /// Finds the files that would block an export with `overwrite` off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if an existing target cannot be read.
    pub fn conflicts(&self, base: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .plan(base)?
            .into_iter()
            .filter(|p| p.outcome == FileOutcome::Updated)
            .map(|p| p.disk_path)
            .collect())
    }

    /// Writes every file under `base`, creating directories as needed.
    ///
    /// Returns one entry per file, in set order.
    ///
    /// # Errors
    ///
    /// - `Error::OutputConflict` if a target exists with different content
    ///   and `options.overwrite` is off; nothing is written in that case
    /// - `Error::Io` if a directory or file cannot be created or written
    pub fn export_to(&self, base: &Path, options: &ExportOptions) -> Result<Vec<WrittenFile>> {
        let planned = self.checked_plan(base, options)?;

        create_directories(&collect_directories(base, &planned))?;

        let mut written = Vec::with_capacity(planned.len());
        for entry in planned {
            if entry.outcome.is_write() {
                write_file(&entry.disk_path, &entry.file.content, options)?;
                tracing::debug!("{} {}", entry.outcome, entry.disk_path.display());
            }
            written.push(WrittenFile {
                path: entry.disk_path,
                outcome: entry.outcome,
            });
        }

        Ok(written)
    }

    /// Reports what [`export_to`](Self::export_to) would do without
    /// touching the disk.
    ///
    /// # Errors
    ///
    /// Same conflict and read errors as `export_to`.
    pub fn preview(&self, base: &Path, options: &ExportOptions) -> Result<Vec<WrittenFile>> {
        Ok(self
            .checked_plan(base, options)?
            .into_iter()
            .map(|p| WrittenFile {
                path: p.disk_path,
                outcome: p.outcome,
            })
            .collect())
    }

    fn checked_plan(&self, base: &Path, options: &ExportOptions) -> Result<Vec<Planned<'_>>> {
        let planned = self.plan(base)?;

        if !options.overwrite
            && let Some(conflict) = planned.iter().find(|p| p.outcome == FileOutcome::Updated)
        {
            tracing::warn!("Refusing to overwrite {}", conflict.disk_path.display());
            return Err(Error::OutputConflict {
                path: conflict.disk_path.clone(),
            });
        }

        Ok(planned)
    }

    fn plan(&self, base: &Path) -> Result<Vec<Planned<'_>>> {
        self.files()
            .iter()
            .map(|file| {
                let disk_path = file.path.to_disk_path(base);
                let outcome = existing_outcome(&disk_path, &file.content)?;
                Ok(Planned {
                    file,
                    disk_path,
                    outcome,
                })
            })
            .collect()
    }
}

fn existing_outcome(path: &Path, content: &str) -> Result<FileOutcome> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => Ok(FileOutcome::Unchanged),
        Ok(_) => Ok(FileOutcome::Updated),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileOutcome::Created),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn collect_directories(base: &Path, planned: &[Planned<'_>]) -> BTreeSet<PathBuf> {
    let mut dirs = BTreeSet::new();
    dirs.insert(base.to_path_buf());

    for entry in planned.iter().filter(|p| p.outcome.is_write()) {
        if let Some(parent) = entry.disk_path.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }

    dirs
}

fn create_directories(dirs: &BTreeSet<PathBuf>) -> Result<()> {
    for dir in dirs {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str, options: &ExportOptions) -> Result<()> {
    let io_error = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if !options.atomic {
        return fs::write(path, content).map_err(io_error);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(content.as_bytes()).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}
