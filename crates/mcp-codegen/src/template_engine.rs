//! Template engine for code generation using Handlebars.
//!
//! Wraps Handlebars with the built-in Rust module templates registered.
//! Strict mode is on, so a template referencing a missing context field
//! fails instead of rendering an empty string, and HTML escaping is off
//! because the output is Rust source.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "// {{name}} & co").unwrap();
//! assert_eq!(engine.render("greeting", &json!({"name": "gdrive"})).unwrap(), "// gdrive & co");
//! ```

use handlebars::{Handlebars, no_escape};
use mcp_toolgen_core::{Error, Result};
use serde::Serialize;

/// Name of the `mod.rs` template.
pub const MOD_TEMPLATE: &str = "rust/mod";
/// Name of the `client.rs` template.
pub const CLIENT_TEMPLATE: &str = "rust/client";
/// Name of the `tools.rs` template.
pub const TOOLS_TEMPLATE: &str = "rust/tools";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (MOD_TEMPLATE, include_str!("../templates/rust/mod.rs.hbs")),
    (CLIENT_TEMPLATE, include_str!("../templates/rust/client.rs.hbs")),
    (TOOLS_TEMPLATE, include_str!("../templates/rust/tools.rs.hbs")),
];

/// Template engine for code generation.
#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Creates an engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if a built-in template fails to
    /// parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);

        let mut engine = Self { handlebars };
        for (name, template) in BUILTIN_TEMPLATES {
            engine.register_template_string(name, template)?;
        }

        tracing::debug!("Registered {} built-in templates", BUILTIN_TEMPLATES.len());
        Ok(engine)
    }

    /// Renders a registered template.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if the template is unknown, the
    /// context lacks a referenced field, or rendering fails.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::CodeGeneration {
                target: template_name.to_string(),
                message: format!("template rendering failed: {e}"),
            })
    }

    /// Registers an additional template.
    ///
    /// # Errors
    ///
    /// Returns `Error::CodeGeneration` if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::CodeGeneration {
                target: name.to_string(),
                message: format!("invalid template: {e}"),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
