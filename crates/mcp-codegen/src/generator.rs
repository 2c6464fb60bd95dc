//! Tool generator facade.
//!
//! [`ToolGenerator`] ties discovery, the registry and the emitter together:
//! scan one or more servers, inspect what was found, then generate typed
//! stubs for them.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_codegen::ToolGenerator;
//! use mcp_toolgen_core::{RawTool, ServerId};
//! use mcp_toolgen_introspector::StaticSource;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let generator = ToolGenerator::new().unwrap();
//! let source = StaticSource::new("gdrive", vec![RawTool {
//!     name: "get-document!".into(),
//!     description: Some("Fetches a document".into()),
//!     input_schema: json!({
//!         "type": "object",
//!         "properties": {"document_id": {"type": "string"}},
//!         "required": ["document_id"]
//!     }),
//! }]);
//!
//! generator.scan_source(ServerId::new("gdrive"), &source).await.unwrap();
//! assert_eq!(generator.list_tools(), vec!["gdrive.get-document!"]);
//!
//! let info = generator.get_tool_info("get-document!").unwrap();
//! assert_eq!(info.symbol.derived_function_name, "get_document_");
//! # });
//! ```

use crate::emitter::{CodeEmitter, GenerateOptions};
use crate::identifiers::{GeneratedSymbol, IdentifierMapper};
use crate::plan::{EmissionPlan, validate_catalog};
use crate::report::GenerationReport;
use mcp_toolgen_core::{
    Error, Registry, Result, ServerCatalog, ServerConfig, ServerId, ToolDescriptor,
};
use mcp_toolgen_introspector::{Introspector, ScanOutcome, StdioSource, ToolSource, derive_server_id};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// A tool descriptor together with the names its stub is generated under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInfo {
    /// Normalized descriptor
    pub descriptor: ToolDescriptor,
    /// Derived module and function names
    pub symbol: GeneratedSymbol,
}

/// Scans MCP servers and generates typed Rust stubs for their tools.
#[derive(Debug)]
pub struct ToolGenerator {
    registry: Arc<Registry>,
    introspector: Introspector,
    emitter: CodeEmitter,
}

impl ToolGenerator {
    /// Creates a generator with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if a built-in template is invalid.
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Creates a generator that records into an existing registry.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if a built-in template is invalid.
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        Ok(Self {
            registry,
            introspector: Introspector::new(),
            emitter: CodeEmitter::new()?,
        })
    }

    /// Returns the shared registry.
    #[must_use]
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Launches `command_and_args`, records its tools and shuts it down.
    ///
    /// The server id is derived from the command line.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if no command is given, and
    /// connection or security errors from launching the server.
    pub async fn connect_and_scan<S: AsRef<str>>(&self, command_and_args: &[S]) -> Result<ServerId> {
        let (command, args) = command_and_args
            .split_first()
            .ok_or_else(|| Error::InvalidArgument("command is required".to_string()))?;

        let config = ServerConfig::builder()
            .command(command.as_ref())
            .args(args.iter().map(AsRef::as_ref))
            .try_build()?;
        let server_id = derive_server_id(&config);

        self.connect_and_scan_as(server_id.clone(), config).await?;
        Ok(server_id)
    }

    /// Like [`connect_and_scan`](Self::connect_and_scan) with an explicit
    /// id and full launch configuration. Returns the number of tools
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns connection or security errors from launching the server.
    pub async fn connect_and_scan_as(&self, server_id: ServerId, config: ServerConfig) -> Result<usize> {
        let source = StdioSource::new(config);
        self.scan_source(server_id, &source).await
    }

    /// Scans any tool source and records the result.
    ///
    /// # Errors
    ///
    /// Returns the source's discovery error; the registry is unchanged.
    pub async fn scan_source(&self, server_id: ServerId, source: &dyn ToolSource) -> Result<usize> {
        let catalog = self.introspector.scan(server_id, source).await?;
        let count = catalog.tools.len();
        self.registry.record_scan(catalog);
        Ok(count)
    }

    /// Scans several sources concurrently. One failing source never
    /// affects the others.
    pub async fn scan_all(&self, sources: Vec<(ServerId, Arc<dyn ToolSource>)>) -> Vec<ScanOutcome> {
        self.introspector.scan_all(&self.registry, sources).await
    }

    /// Lists qualified tool names in discovery order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        self.registry.list_tools()
    }

    /// Returns the number of recorded tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.registry.tool_count()
    }

    /// Looks up a tool and the names its stub would get in a full run.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no tool matches, or the validation or
    /// naming error that would stop its server from being generated.
    pub fn get_tool_info(&self, name: &str) -> Result<ToolInfo> {
        let descriptor = self.registry.get_tool_info(name)?;
        let mut mapper = IdentifierMapper::new();

        // Replays naming in the same order as a full generation run.
        for catalog in self.registry.servers() {
            let is_target = catalog.server_id == descriptor.server_id;
            match validate_catalog(&catalog) {
                Ok(()) => {}
                Err(e) if is_target => return Err(e),
                Err(_) => continue,
            }

            mapper.module_name(&catalog.server_id)?;
            if !is_target {
                continue;
            }
            for tool in &catalog.tools {
                let symbol = mapper.derive(&catalog.server_id, tool.name.as_str())?;
                if tool.name == descriptor.name {
                    return Ok(ToolInfo { descriptor, symbol });
                }
            }
        }

        Err(Error::NotFound {
            resource: format!("tool:{name}"),
        })
    }

    /// Plans generation without rendering or writing.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `server_name` selects nothing.
    pub fn plan(&self, server_name: Option<&str>) -> Result<EmissionPlan> {
        let (catalogs, module_override) = self.select(server_name)?;
        Ok(CodeEmitter::plan(&catalogs, module_override))
    }

    /// Generates stubs for recorded servers into `output_dir`.
    ///
    /// With `server_name`, generates only the server with that id; if no
    /// server has that id and exactly one server is recorded, that server
    /// is generated under the module name `server_name`.
    ///
    /// Per-server failures are reported, not returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `server_name` selects nothing.
    pub fn generate_code(
        &self,
        output_dir: impl AsRef<Path>,
        overwrite: bool,
        server_name: Option<&str>,
    ) -> Result<GenerationReport> {
        let options = GenerateOptions::new(output_dir.as_ref()).with_overwrite(overwrite);
        self.generate(&options, server_name)
    }

    /// Like [`generate_code`](Self::generate_code) with full options.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `server_name` selects nothing.
    pub fn generate(&self, options: &GenerateOptions, server_name: Option<&str>) -> Result<GenerationReport> {
        let (catalogs, module_override) = self.select(server_name)?;
        if catalogs.is_empty() {
            tracing::warn!("No servers recorded, nothing to generate");
        }
        Ok(self.emitter.generate(&catalogs, module_override, options))
    }

    fn select<'a>(&self, server_name: Option<&'a str>) -> Result<(Vec<ServerCatalog>, Option<&'a str>)> {
        let Some(name) = server_name else {
            return Ok((self.registry.servers(), None));
        };

        if let Ok(catalog) = self.registry.server(&ServerId::new(name)) {
            return Ok((vec![catalog], None));
        }

        let servers = self.registry.servers();
        if servers.len() == 1 {
            tracing::debug!(
                "Generating '{}' as module '{}'",
                servers[0].server_id,
                name
            );
            return Ok((servers, Some(name)));
        }

        Err(Error::NotFound {
            resource: format!("server:{name}"),
        })
    }
}
