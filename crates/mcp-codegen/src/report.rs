//! Per-server results of a generation run.

use mcp_toolgen_core::{Error, RejectedTool, ServerId};
use mcp_toolgen_files::WrittenFile;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// How far a server got through generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenerationStage {
    /// Catalog loaded from the registry
    Scanned,
    /// Catalog passed validation
    Validated,
    /// Identifiers and types derived
    Planned,
    /// Files rendered and written (or previewed)
    Written,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scanned => "scanned",
            Self::Validated => "validated",
            Self::Planned => "planned",
            Self::Written => "written",
        };
        f.write_str(name)
    }
}

/// Why a server produced no output.
#[derive(Debug)]
pub struct ServerFailure {
    /// Server that failed
    pub server_id: ServerId,
    /// Last stage the server completed
    pub stage: GenerationStage,
    /// Cause
    pub error: Error,
}

impl fmt::Display for ServerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "server '{}' failed after stage '{}': {}",
            self.server_id, self.stage, self.error
        )
    }
}

/// Outcome for one server.
#[derive(Debug)]
pub struct ServerReport {
    /// Server id
    pub server_id: ServerId,
    /// Output module, once planned
    pub module_name: Option<String>,
    /// Last stage reached
    pub stage: GenerationStage,
    /// Files written, or that would be written on a dry run
    pub files: Vec<WrittenFile>,
    /// Tools left out because their schema was rejected
    pub skipped: Vec<RejectedTool>,
    /// Failure, if the server did not reach [`GenerationStage::Written`]
    pub failure: Option<ServerFailure>,
}

impl ServerReport {
    /// Returns `true` if all files of this server were produced.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of files that were (or would be) changed on disk.
    #[must_use]
    pub fn changed_files(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_write()).count()
    }
}

/// Outcome of a whole generation run.
#[derive(Debug)]
pub struct GenerationReport {
    /// Output root
    pub output_dir: PathBuf,
    /// Whether nothing was written
    pub dry_run: bool,
    /// One entry per server, in input order
    pub servers: Vec<ServerReport>,
}

impl GenerationReport {
    /// Groups file paths by server id.
    #[must_use]
    pub fn files_by_server(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.servers
            .iter()
            .map(|s| {
                let paths = s.files.iter().map(|f| f.path.clone()).collect();
                (s.server_id.to_string(), paths)
            })
            .collect()
    }

    /// Returns `true` if every server succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.servers.iter().all(ServerReport::is_success)
    }

    /// Returns the servers that failed.
    #[must_use]
    pub fn failed_servers(&self) -> Vec<&ServerFailure> {
        self.servers
            .iter()
            .filter_map(|s| s.failure.as_ref())
            .collect()
    }

    /// Total number of files across all servers.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.servers.iter().map(|s| s.files.len()).sum()
    }
}
