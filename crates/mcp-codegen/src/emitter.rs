//! Code Emitter: renders plans into files and writes them.
//!
//! Each server is handled on its own: one server failing validation,
//! planning, rendering or writing never stops the others, and a server's
//! files are written all-or-nothing with respect to conflicts.
//!
//! Output layout under the output directory:
//!
//! ```text
//! <module>/mod.rs     module docs and re-exports
//! <module>/client.rs  session holder and dispatch
//! <module>/tools.rs   one async stub per tool, plus generated types
//! ```

use crate::identifiers::IdentifierMapper;
use crate::plan::{EmissionPlan, ServerPlan, plan_server, validate_catalog};
use crate::report::{GenerationReport, GenerationStage, ServerFailure, ServerReport};
use crate::template_engine::{CLIENT_TEMPLATE, MOD_TEMPLATE, TOOLS_TEMPLATE, TemplateEngine};
use mcp_toolgen_core::{Error, Result, ServerCatalog};
use mcp_toolgen_files::{ExportOptions, FilesBuilder, OutputSet};
use std::path::PathBuf;

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output root
    pub output_dir: PathBuf,
    /// Replace files whose content differs
    pub overwrite: bool,
    /// Report what would be written without writing
    pub dry_run: bool,
}

impl GenerateOptions {
    /// Creates options writing to `output_dir` without overwriting.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite: false,
            dry_run: false,
        }
    }

    /// Sets whether divergent files may be replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Renders and writes server modules.
#[derive(Debug)]
pub struct CodeEmitter {
    engine: TemplateEngine,
}

impl CodeEmitter {
    /// Creates an emitter with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if a built-in template is invalid.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Plans every catalog in order with one shared identifier mapper.
    ///
    /// `module_override` renames the module when exactly one catalog is
    /// given and is ignored otherwise.
    #[must_use]
    pub fn plan(catalogs: &[ServerCatalog], module_override: Option<&str>) -> EmissionPlan {
        let module_override = if catalogs.len() == 1 {
            module_override
        } else {
            if module_override.is_some() {
                tracing::warn!(
                    "Ignoring module name override for {} servers",
                    catalogs.len()
                );
            }
            None
        };

        let mut mapper = IdentifierMapper::new();
        let mut plan = EmissionPlan::default();

        for catalog in catalogs {
            let planned = validate_catalog(catalog)
                .map_err(|e| (GenerationStage::Scanned, e))
                .and_then(|()| {
                    tracing::debug!("Server '{}' validated", catalog.server_id);
                    plan_server(catalog, &mut mapper, module_override)
                        .map_err(|e| (GenerationStage::Validated, e))
                });

            match planned {
                Ok(server) => plan.servers.push(server),
                Err((stage, error)) => {
                    let failure = ServerFailure {
                        server_id: catalog.server_id.clone(),
                        stage,
                        error,
                    };
                    tracing::error!("{}", failure);
                    plan.failures.push(failure);
                }
            }
        }
        plan
    }

    /// Renders the three files of a server module.
    ///
    /// Every file is parsed as Rust before it is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if rendering fails or a file does
    /// not parse.
    pub fn render(&self, plan: &ServerPlan) -> Result<OutputSet> {
        let module = &plan.module_name;
        let mut files = FilesBuilder::new();

        for (template, file) in [
            (MOD_TEMPLATE, "mod.rs"),
            (CLIENT_TEMPLATE, "client.rs"),
            (TOOLS_TEMPLATE, "tools.rs"),
        ] {
            let path = format!("{module}/{file}");
            let content = self.engine.render(template, plan)?;
            check_syntax(&path, &content)?;
            files = files.add_file(path, content);
        }

        files.build()
    }

    /// Runs a full generation: plan, render and write each server.
    ///
    /// Never fails as a whole; per-server errors are in the report.
    #[must_use]
    pub fn generate(
        &self,
        catalogs: &[ServerCatalog],
        module_override: Option<&str>,
        options: &GenerateOptions,
    ) -> GenerationReport {
        tracing::info!(
            "Generating {} server module(s) into {}{}",
            catalogs.len(),
            options.output_dir.display(),
            if options.dry_run { " (dry run)" } else { "" }
        );

        let plan = Self::plan(catalogs, module_override);
        let export = ExportOptions::new().with_overwrite(options.overwrite);

        let mut failures = plan.failures.into_iter();
        let mut planned = plan.servers.into_iter().peekable();
        let mut servers = Vec::with_capacity(catalogs.len());

        // Plans and failures are both in catalog order.
        for catalog in catalogs {
            let report = match planned.next_if(|p| p.server_id == catalog.server_id) {
                Some(server) => self.emit(server, options, &export),
                None => {
                    let failure = failures.next().unwrap_or_else(|| ServerFailure {
                        server_id: catalog.server_id.clone(),
                        stage: GenerationStage::Scanned,
                        error: Error::CodeGeneration {
                            target: catalog.server_id.to_string(),
                            message: "server was not planned".to_string(),
                        },
                    });
                    ServerReport {
                        server_id: catalog.server_id.clone(),
                        module_name: None,
                        stage: failure.stage,
                        files: Vec::new(),
                        skipped: catalog.rejected.clone(),
                        failure: Some(failure),
                    }
                }
            };
            servers.push(report);
        }

        let report = GenerationReport {
            output_dir: options.output_dir.clone(),
            dry_run: options.dry_run,
            servers,
        };
        tracing::info!(
            "Generation finished: {} file(s), {} failed server(s)",
            report.file_count(),
            report.failed_servers().len()
        );
        report
    }

    fn emit(&self, plan: ServerPlan, options: &GenerateOptions, export: &ExportOptions) -> ServerReport {
        let mut report = ServerReport {
            server_id: plan.server_id.clone(),
            module_name: Some(plan.module_name.clone()),
            stage: GenerationStage::Planned,
            files: Vec::new(),
            skipped: plan.skipped.clone(),
            failure: None,
        };

        let written = self.render(&plan).and_then(|files| {
            if options.dry_run {
                files.preview(&options.output_dir, export)
            } else {
                files.export_to(&options.output_dir, export)
            }
        });

        match written {
            Ok(files) => {
                tracing::info!(
                    "Server '{}': {} file(s) in module '{}'",
                    plan.server_id,
                    files.len(),
                    plan.module_name
                );
                report.files = files;
                report.stage = GenerationStage::Written;
            }
            Err(error) => {
                let failure = ServerFailure {
                    server_id: plan.server_id,
                    stage: GenerationStage::Planned,
                    error,
                };
                tracing::error!("{}", failure);
                report.failure = Some(failure);
            }
        }
        report
    }
}

fn check_syntax(path: &str, content: &str) -> Result<()> {
    syn::parse_file(content)
        .map(drop)
        .map_err(|e| Error::CodeGeneration {
            target: path.to_string(),
            message: format!("generated code does not parse: {e}"),
        })
}
