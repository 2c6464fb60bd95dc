//! Identifier Mapper: raw MCP names to valid, unique Rust identifiers.
//!
//! Tool names come from servers and may contain anything (`get-document!`,
//! `3d.render`, `type`). Every name passes through [`sanitize`], then a
//! [`Namespace`] makes it unique by appending `_2`, `_3`, … in the order
//! names are first claimed.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_codegen::identifiers::IdentifierMapper;
//! use mcp_toolgen_core::ServerId;
//!
//! let mut mapper = IdentifierMapper::new();
//! let server = ServerId::new("google-drive");
//!
//! let first = mapper.derive(&server, "list_files").unwrap();
//! let second = mapper.derive(&server, "list-files").unwrap();
//!
//! assert_eq!(first.derived_module_name, "google_drive");
//! assert_eq!(first.derived_function_name, "list_files");
//! assert_eq!(second.derived_function_name, "list_files_2");
//! ```

use mcp_toolgen_core::{Error, Result, ServerId, ToolName};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Highest collision suffix tried before giving up.
pub const DEFAULT_SUFFIX_LIMIT: usize = 1000;

/// Strict, reserved and edition-specific Rust keywords.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Identifiers a stub body uses besides its parameters.
pub const RESERVED_PARAMETER_NAMES: &[&str] = &["client", "arguments"];

/// Type names imported into every generated `tools.rs`.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Client",
    "Value",
    "Map",
    "Arguments",
    "Result",
    "Serialize",
    "Deserialize",
    "Option",
    "String",
    "Vec",
];

/// Returns `true` if `name` is a Rust keyword.
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Turns an arbitrary string into a snake_case Rust identifier.
///
/// Lower-cases ASCII letters, replaces every other character that is not
/// ASCII alphanumeric with `_`, collapses runs of `_`, prefixes `_` before a
/// leading digit, and appends `_` to keywords. A result made only of
/// underscores is prefixed with `tool`.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_codegen::identifiers::sanitize;
///
/// assert_eq!(sanitize("get-document!"), "get_document_");
/// assert_eq!(sanitize("List  Files"), "list_files");
/// assert_eq!(sanitize("3d-render"), "_3d_render");
/// assert_eq!(sanitize("type"), "type_");
/// assert_eq!(sanitize("!!!"), "tool_");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        let next = if ch.is_ascii_alphanumeric() {
            ch.to_ascii_lowercase()
        } else {
            '_'
        };
        if next == '_' && out.ends_with('_') {
            continue;
        }
        out.push(next);
    }

    if out.chars().all(|c| c == '_') {
        return format!("tool{out}");
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if is_keyword(&out) {
        out.push('_');
    }
    out
}

/// Turns an arbitrary string into a PascalCase Rust type name.
///
/// Returns an empty string when `raw` has no alphanumeric characters.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_codegen::identifiers::to_pascal_case;
///
/// assert_eq!(to_pascal_case("create_issue"), "CreateIssue");
/// assert_eq!(to_pascal_case("in-progress"), "InProgress");
/// assert_eq!(to_pascal_case("2fa"), "_2fa");
/// assert_eq!(to_pascal_case("self"), "Self_");
/// ```
#[must_use]
pub fn to_pascal_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for word in raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if is_keyword(&out) {
        out.push('_');
    }
    out
}

/// Set of identifiers already handed out in one scope.
#[derive(Debug, Clone)]
pub struct Namespace {
    label: String,
    taken: HashSet<String>,
    limit: usize,
}

impl Namespace {
    /// Creates an empty namespace. `label` appears in error messages.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            taken: HashSet::new(),
            limit: DEFAULT_SUFFIX_LIMIT,
        }
    }

    /// Marks names as unavailable.
    #[must_use]
    pub fn with_reserved<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.taken.extend(names.into_iter().map(str::to_string));
        self
    }

    /// Sets the highest suffix tried.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(2);
        self
    }

    /// Returns `true` if `name` is already taken.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Claims `base`, or `base_2`, `base_3`, … if it is taken.
    ///
    /// `base` must already be a valid identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollisionExhausted` when every suffix up to the
    /// limit is taken.
    pub fn claim(&mut self, base: &str) -> Result<String> {
        if self.taken.insert(base.to_string()) {
            return Ok(base.to_string());
        }

        for n in 2..=self.limit {
            let candidate = format!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                tracing::debug!("'{}' taken in {}, using '{}'", base, self.label, candidate);
                return Ok(candidate);
            }
        }

        Err(Error::NameCollisionExhausted {
            name: base.to_string(),
            namespace: self.label.clone(),
            limit: self.limit,
        })
    }
}

/// Names derived for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSymbol {
    /// Raw tool name, used for dispatch
    pub source_tool_name: ToolName,
    /// Stub function name, unique within the server module
    pub derived_function_name: String,
    /// Module the stub lives in, unique within the output directory
    pub derived_module_name: String,
}

/// Derives module and function names across a generation run.
///
/// Module names share one workspace-wide namespace; function names get one
/// namespace per server. Results depend only on call order.
#[derive(Debug, Clone)]
pub struct IdentifierMapper {
    modules: Namespace,
    module_names: HashMap<ServerId, String>,
    functions: HashMap<ServerId, Namespace>,
    limit: usize,
}

impl Default for IdentifierMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierMapper {
    /// Creates a mapper with [`DEFAULT_SUFFIX_LIMIT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_SUFFIX_LIMIT)
    }

    /// Creates a mapper with a custom suffix limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            modules: Namespace::new("modules").with_limit(limit),
            module_names: HashMap::new(),
            functions: HashMap::new(),
            limit,
        }
    }

    /// Returns the module name for a server, deriving it on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollisionExhausted` if no unique name is left.
    pub fn module_name(&mut self, server_id: &ServerId) -> Result<String> {
        self.module_name_from(server_id, server_id.as_str())
    }

    /// Like [`module_name`](Self::module_name), but derives the name from
    /// `preferred` instead of the server id.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollisionExhausted` if no unique name is left.
    pub fn module_name_from(&mut self, server_id: &ServerId, preferred: &str) -> Result<String> {
        if let Some(name) = self.module_names.get(server_id) {
            return Ok(name.clone());
        }
        let name = self.modules.claim(&sanitize(preferred))?;
        self.module_names.insert(server_id.clone(), name.clone());
        Ok(name)
    }

    /// Derives the names for one tool of a server.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollisionExhausted` if no unique name is left.
    pub fn derive(&mut self, server_id: &ServerId, raw_tool_name: &str) -> Result<GeneratedSymbol> {
        let module = self.module_name(server_id)?;
        let limit = self.limit;
        let functions = self
            .functions
            .entry(server_id.clone())
            .or_insert_with(|| Namespace::new(format!("server '{server_id}'")).with_limit(limit));

        Ok(GeneratedSymbol {
            source_tool_name: ToolName::new(raw_tool_name),
            derived_function_name: functions.claim(&sanitize(raw_tool_name))?,
            derived_module_name: module,
        })
    }
}

/// Namespace for the parameters of one stub.
#[must_use]
pub fn parameter_namespace(function_name: &str) -> Namespace {
    Namespace::new(format!("parameters of '{function_name}'"))
        .with_reserved(RESERVED_PARAMETER_NAMES.iter().copied())
}

/// Namespace for the generated types of one server module.
#[must_use]
pub fn type_namespace(module_name: &str) -> Namespace {
    Namespace::new(format!("types of '{module_name}'"))
        .with_reserved(RESERVED_TYPE_NAMES.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_ident(name: &str) -> bool {
        syn::parse_str::<syn::Ident>(name).is_ok()
    }

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(sanitize("get-document!"), "get_document_");
        assert_eq!(sanitize("list-files"), "list_files");
        assert_eq!(sanitize("CreateIssue"), "createissue");
        assert_eq!(sanitize("a..b"), "a_b");
        assert_eq!(sanitize("_private"), "_private");
        assert_eq!(sanitize("42"), "_42");
    }

    #[test]
    fn test_sanitize_degenerate() {
        assert_eq!(sanitize(""), "tool");
        assert_eq!(sanitize("_"), "tool_");
        assert_eq!(sanitize("日本語"), "tool_");
        assert_eq!(sanitize("self"), "self_");
        assert_eq!(sanitize("Self"), "self_");
    }

    #[test]
    fn test_sanitize_always_valid_ident() {
        let inputs = [
            "get-document!",
            "",
            "_",
            "__",
            "123",
            "type",
            "async",
            "crate",
            "super",
            "gen",
            "naïve café",
            "a b c",
            "résumé-2",
            "🚀launch",
            "x".repeat(200).as_str(),
        ]
        .map(String::from);

        for input in &inputs {
            let out = sanitize(input);
            assert!(is_ident(&out), "{input:?} -> {out:?}");
            assert_eq!(out, sanitize(input), "not deterministic for {input:?}");
        }
    }

    #[test]
    fn test_pascal_case_valid_idents() {
        for input in ["create_issue", "in-progress", "2fa", "self", "a", "URL_path"] {
            let out = to_pascal_case(input);
            assert!(is_ident(&out), "{input:?} -> {out:?}");
        }
        assert_eq!(to_pascal_case("---"), "");
        assert_eq!(to_pascal_case("URL_path"), "URLPath");
    }

    #[test]
    fn test_namespace_suffixes_in_order() {
        let mut ns = Namespace::new("test");
        let names: Vec<_> = (0..4).map(|_| ns.claim("search").unwrap()).collect();
        assert_eq!(names, vec!["search", "search_2", "search_3", "search_4"]);
    }

    #[test]
    fn test_namespace_skips_taken_suffix() {
        let mut ns = Namespace::new("test");
        assert_eq!(ns.claim("a_2").unwrap(), "a_2");
        assert_eq!(ns.claim("a").unwrap(), "a");
        assert_eq!(ns.claim("a").unwrap(), "a_3");
    }

    #[test]
    fn test_namespace_exhaustion() {
        let mut ns = Namespace::new("tiny").with_limit(3);
        ns.claim("x").unwrap();
        ns.claim("x").unwrap();
        ns.claim("x").unwrap();

        let err = ns.claim("x").unwrap_err();
        assert!(err.is_name_collision());
        assert!(err.to_string().contains("tiny"));
    }

    #[test]
    fn test_reserved_parameter_names() {
        let mut ns = parameter_namespace("search");
        assert_eq!(ns.claim(&sanitize("client")).unwrap(), "client_2");
        assert_eq!(ns.claim(&sanitize("arguments")).unwrap(), "arguments_2");
        assert_eq!(ns.claim(&sanitize("query")).unwrap(), "query");
    }

    #[test]
    fn test_reserved_type_names() {
        let mut ns = type_namespace("gdrive");
        assert_eq!(ns.claim("Value").unwrap(), "Value_2");
        assert_eq!(ns.claim("Document").unwrap(), "Document");
    }

    #[test]
    fn test_mapper_n_collisions_distinct() {
        let mut mapper = IdentifierMapper::new();
        let server = ServerId::new("s");
        let raw = ["list files", "list-files", "list_files", "LIST.FILES", "list__files"];

        let names: Vec<_> = raw
            .iter()
            .map(|r| mapper.derive(&server, r).unwrap().derived_function_name)
            .collect();

        assert_eq!(
            names,
            vec!["list_files", "list_files_2", "list_files_3", "list_files_4", "list_files_5"]
        );
    }

    #[test]
    fn test_mapper_namespaces_per_server() {
        let mut mapper = IdentifierMapper::new();
        let a = mapper.derive(&ServerId::new("a"), "search").unwrap();
        let b = mapper.derive(&ServerId::new("b"), "search").unwrap();

        assert_eq!(a.derived_function_name, "search");
        assert_eq!(b.derived_function_name, "search");
        assert_eq!(a.derived_module_name, "a");
        assert_eq!(b.derived_module_name, "b");
    }

    #[test]
    fn test_mapper_module_collisions() {
        let mut mapper = IdentifierMapper::new();
        let first = mapper.module_name(&ServerId::new("google-drive")).unwrap();
        let second = mapper.module_name(&ServerId::new("google_drive")).unwrap();
        let again = mapper.module_name(&ServerId::new("google-drive")).unwrap();

        assert_eq!(first, "google_drive");
        assert_eq!(second, "google_drive_2");
        assert_eq!(again, "google_drive");
    }

    #[test]
    fn test_mapper_preferred_module_name() {
        let mut mapper = IdentifierMapper::new();
        let server = ServerId::new("gdrive");
        assert_eq!(
            mapper.module_name_from(&server, "google_drive").unwrap(),
            "google_drive"
        );
        let symbol = mapper.derive(&server, "get-document!").unwrap();
        assert_eq!(symbol.derived_module_name, "google_drive");
        assert_eq!(symbol.derived_function_name, "get_document_");
        assert_eq!(symbol.source_tool_name.as_str(), "get-document!");
    }
}
