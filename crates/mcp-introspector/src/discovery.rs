//! Scanning sources into server catalogs.
//!
//! A scan turns one [`ToolSource`] into a [`ServerCatalog`]. Tools whose
//! schema cannot be normalized are kept as rejected entries instead of
//! failing the scan; only connection and transport errors are fatal, and
//! only to the server that produced them.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::{RawTool, Registry, ServerId};
//! use mcp_toolgen_introspector::{Introspector, StaticSource, ToolSource};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let source = StaticSource::new("files", vec![
//!     RawTool { name: "list_files".into(), description: None, input_schema: json!({"type": "object"}) },
//!     RawTool { name: "broken".into(), description: None, input_schema: json!("nope") },
//! ]);
//!
//! let source: Arc<dyn ToolSource> = Arc::new(source);
//! let registry = Registry::new();
//! let outcomes = Introspector::new()
//!     .scan_all(&registry, vec![(ServerId::new("files"), source)])
//!     .await;
//!
//! assert_eq!(outcomes[0].result.as_ref().unwrap(), &1);
//! assert_eq!(registry.list_tools(), vec!["files.list_files"]);
//! assert_eq!(registry.rejected_tools(&ServerId::new("files")).unwrap().len(), 1);
//! # });
//! ```

use crate::source::ToolSource;
use chrono::Utc;
use mcp_toolgen_core::{
    Error, RejectedTool, Registry, Result, ServerCatalog, ServerId, normalize_tool,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Result of scanning one server as part of [`Introspector::scan_all`].
#[derive(Debug)]
pub struct ScanOutcome {
    /// Server the scan was for
    pub server_id: ServerId,
    /// Number of tools recorded, or the error that stopped the scan
    pub result: Result<usize>,
}

/// Scans tool sources and records the results.
#[derive(Debug, Clone)]
pub struct Introspector {
    max_concurrent: usize,
}

impl Default for Introspector {
    fn default() -> Self {
        Self {
            max_concurrent: Self::DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl Introspector {
    /// Default number of servers scanned at once.
    pub const DEFAULT_MAX_CONCURRENT: usize = 8;

    /// Creates an introspector with the default concurrency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many servers [`scan_all`](Self::scan_all) scans at once.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Scans one source.
    ///
    /// # Errors
    ///
    /// Returns the source's discovery error. Normalization failures are
    /// recorded in [`ServerCatalog::rejected`] instead.
    pub async fn scan(&self, server_id: ServerId, source: &dyn ToolSource) -> Result<ServerCatalog> {
        tracing::info!("Scanning '{}' ({})", server_id, source.label());

        let discovery = source.discover().await?;
        Ok(catalog_from(server_id, discovery))
    }

    /// Scans every source concurrently and records each catalog.
    ///
    /// Scans run as tasks on a `JoinSet`; the calling task is the only
    /// writer to `registry` and merges each catalog with a single
    /// `record_scan`. Catalogs are merged in input order once all scans
    /// finish, so the registry order does not depend on which server
    /// answered first. A failing server never affects the others, and a
    /// scan task that panics yields an `Error::ExecutionError` outcome for
    /// its server.
    pub async fn scan_all(
        &self,
        registry: &Registry,
        sources: Vec<(ServerId, Arc<dyn ToolSource>)>,
    ) -> Vec<ScanOutcome> {
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut spawned = HashMap::with_capacity(sources.len());

        for (index, (server_id, source)) in sources.into_iter().enumerate() {
            let permits = Arc::clone(&permits);
            let introspector = self.clone();
            let task_server = server_id.clone();
            let handle = tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = introspector.scan(task_server.clone(), source.as_ref()).await;
                (index, task_server, result)
            });
            spawned.insert(handle.id(), (index, server_id));
        }

        let mut finished = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, done)) => finished.push(done),
                Err(e) => {
                    tracing::error!("Scan task failed: {}", e);
                    if let Some((index, server_id)) = spawned.remove(&e.id()) {
                        let error = Error::ExecutionError {
                            message: format!("scan of '{server_id}' did not complete: {e}"),
                            source: None,
                        };
                        finished.push((index, server_id, Err(error)));
                    }
                }
            }
        }
        finished.sort_by_key(|(index, _, _)| *index);

        finished
            .into_iter()
            .map(|(_, server_id, result)| {
                let result = result.map(|catalog| {
                    let count = catalog.tools.len();
                    registry.record_scan(catalog);
                    count
                });

                if let Err(e) = &result {
                    tracing::warn!("Scan of '{}' failed: {}", server_id, e);
                }

                ScanOutcome { server_id, result }
            })
            .collect()
    }
}

fn catalog_from(server_id: ServerId, discovery: crate::source::Discovery) -> ServerCatalog {
    let mut tools = Vec::with_capacity(discovery.tools.len());
    let mut rejected = Vec::new();

    for raw in discovery.tools {
        let name = raw.name.clone();
        match normalize_tool(&server_id, raw) {
            Ok(tool) => tools.push(tool),
            Err(e) => {
                tracing::warn!("Skipping tool '{}' of '{}': {}", name, server_id, e);
                rejected.push(RejectedTool {
                    name,
                    reason: rejection_reason(&e),
                });
            }
        }
    }

    tracing::debug!(
        "Server '{}' normalized: {} tool(s), {} rejected",
        server_id,
        tools.len(),
        rejected.len()
    );

    ServerCatalog {
        server_id,
        server_name: discovery.server_name,
        server_version: discovery.server_version,
        tools,
        rejected,
        scanned_at: Utc::now(),
    }
}

fn rejection_reason(error: &Error) -> String {
    match error {
        Error::SchemaError { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Discovery, StaticSource};
    use async_trait::async_trait;
    use mcp_toolgen_core::RawTool;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl ToolSource for Failing {
        fn label(&self) -> String {
            "failing".to_string()
        }

        async fn discover(&self) -> Result<Discovery> {
            Err(Error::ConnectionFailed {
                server: "failing".to_string(),
                source: "refused".into(),
            })
        }
    }

    struct Panicking;

    #[async_trait]
    impl ToolSource for Panicking {
        fn label(&self) -> String {
            "panicking".to_string()
        }

        async fn discover(&self) -> Result<Discovery> {
            panic!("listing handler crashed");
        }
    }

    fn raw(name: &str) -> RawTool {
        RawTool {
            name: name.to_string(),
            description: Some(format!("{name} tool")),
            input_schema: json!({"type": "object"}),
        }
    }

    #[tokio::test]
    async fn test_scan_records_rejections() {
        let source = StaticSource::new(
            "demo",
            vec![
                raw("ok"),
                RawTool {
                    name: String::new(),
                    description: None,
                    input_schema: json!({"type": "object"}),
                },
            ],
        );

        let catalog = Introspector::new()
            .scan(ServerId::new("demo"), &source)
            .await
            .unwrap();

        assert_eq!(catalog.tools.len(), 1);
        assert_eq!(catalog.rejected.len(), 1);
        assert!(catalog.rejected[0].reason.contains("missing"));
        assert_eq!(catalog.server_name, "demo");
    }

    #[tokio::test]
    async fn test_scan_all_isolates_failures() {
        let registry = Registry::new();
        let sources: Vec<(ServerId, Arc<dyn ToolSource>)> = vec![
            (ServerId::new("a"), Arc::new(StaticSource::new("a", vec![raw("x")]))),
            (ServerId::new("bad"), Arc::new(Failing)),
            (ServerId::new("c"), Arc::new(StaticSource::new("c", vec![raw("y"), raw("z")]))),
        ];

        let outcomes = Introspector::new()
            .with_max_concurrent(2)
            .scan_all(&registry, sources)
            .await;

        let ids: Vec<_> = outcomes.iter().map(|o| o.server_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "bad", "c"]);
        assert!(outcomes[1].result.as_ref().unwrap_err().is_connection_error());
        assert_eq!(registry.tool_count(), 3);
        assert!(registry.server(&ServerId::new("bad")).is_err());
    }

    #[tokio::test]
    async fn test_scan_all_reports_panicked_scan() {
        let registry = Registry::new();
        let sources: Vec<(ServerId, Arc<dyn ToolSource>)> = vec![
            (ServerId::new("a"), Arc::new(StaticSource::new("a", vec![raw("x")]))),
            (ServerId::new("crashy"), Arc::new(Panicking)),
        ];

        let outcomes = Introspector::new().scan_all(&registry, sources).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].result.as_ref().unwrap(), &1);
        assert_eq!(outcomes[1].server_id.as_str(), "crashy");
        let err = outcomes[1].result.as_ref().unwrap_err();
        assert!(matches!(err, Error::ExecutionError { .. }));
        assert!(err.to_string().contains("crashy"));
        assert_eq!(registry.tool_count(), 1);
    }
}
