//! Default server ids derived from launch commands.

use mcp_toolgen_core::{ServerConfig, ServerId};

const PREFIXES: &[&str] = &["mcp-server-", "mcp_server_", "server-", "mcp-"];
const SUFFIXES: &[&str] = &["-mcp-server", "_mcp_server", "-server", "_server", "-mcp", "_mcp"];
const SCRIPT_EXTENSIONS: &[&str] = &["py", "js", "mjs", "cjs", "ts", "exe", "jar"];

/// Derives a short server id from a launch configuration.
///
/// Uses the last argument that is not a flag (falling back to the command),
/// keeps its final path segment, drops npm scopes, version or image tags and
/// script extensions, then strips common `server-`/`-server`/`-mcp` affixes.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::ServerConfig;
/// use mcp_toolgen_introspector::derive_server_id;
///
/// let npx = ServerConfig::builder()
///     .command("npx")
///     .args(["-y", "@modelcontextprotocol/server-gdrive"])
///     .try_build()
///     .unwrap();
/// assert_eq!(derive_server_id(&npx).as_str(), "gdrive");
///
/// let docker = ServerConfig::builder()
///     .command("docker")
///     .args(["run", "-i", "--rm", "ghcr.io/github/github-mcp-server:latest"])
///     .try_build()
///     .unwrap();
/// assert_eq!(derive_server_id(&docker).as_str(), "github");
/// ```
#[must_use]
pub fn derive_server_id(config: &ServerConfig) -> ServerId {
    let candidate = config
        .args()
        .iter()
        .rev()
        .find(|arg| !arg.starts_with('-') && !arg.trim().is_empty())
        .map_or(config.command(), String::as_str);

    ServerId::new(shorten(candidate))
}

fn shorten(raw: &str) -> String {
    let mut name = raw.trim().rsplit(['/', '\\']).next().unwrap_or(raw);

    // `pkg@1.2.3` / `image:tag`
    if let Some((head, _)) = name.split_once('@').filter(|(head, _)| !head.is_empty()) {
        name = head;
    }
    if let Some((head, _)) = name.split_once(':') {
        name = head;
    }

    if let Some((stem, ext)) = name.rsplit_once('.')
        && SCRIPT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    {
        name = stem;
    }

    if let Some(rest) = PREFIXES.iter().find_map(|p| name.strip_prefix(p)) {
        name = rest;
    }
    if let Some(rest) = SUFFIXES.iter().find_map(|s| name.strip_suffix(s)) {
        name = rest;
    }

    if name.is_empty() {
        "server".to_string()
    } else {
        name.to_string()
    }
}
