//! Integration tests for mcp-toolgen-introspector
//!
//! These tests validate discovery from saved tool listings, rescanning, and
//! server id derivation without launching real MCP servers.

use mcp_toolgen_core::{Registry, ServerConfig, ServerId};
use mcp_toolgen_introspector::{Introspector, StaticSource, StdioSource, ToolSource, derive_server_id};
use std::sync::Arc;

const LISTING: &str = r##"{
  "tools": [
    {
      "name": "get-document!",
      "description": "Fetch a document by id",
      "inputSchema": {
        "type": "object",
        "properties": {"document_id": {"type": "string"}},
        "required": ["document_id"]
      }
    },
    {
      "name": "search",
      "inputSchema": {"type": "object", "properties": {"query": {"type": "string"}}}
    },
    {
      "name": "recursive",
      "inputSchema": {
        "type": "object",
        "$defs": {"N": {"type": "object", "properties": {"next": {"$ref": "#/$defs/N"}}}},
        "properties": {"root": {"$ref": "#/$defs/N"}}
      }
    }
  ]
}"##;

#[tokio::test]
async fn test_scan_saved_listing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gdrive.json");
    std::fs::write(&path, LISTING).unwrap();

    let source = StaticSource::from_json_file(&path).unwrap();
    let catalog = Introspector::new()
        .scan(ServerId::new("gdrive"), &source)
        .await
        .unwrap();

    assert_eq!(catalog.server_name, "gdrive");
    let names: Vec<_> = catalog.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["get-document!", "search"]);
    assert_eq!(catalog.rejected.len(), 1);
    assert_eq!(catalog.rejected[0].name, "recursive");
}

#[tokio::test]
async fn test_rescan_replaces_catalog() {
    let registry = Registry::new();
    let introspector = Introspector::new();

    let first: Arc<dyn ToolSource> = Arc::new(StaticSource::from_json_str(LISTING, "gdrive").unwrap());
    introspector
        .scan_all(&registry, vec![(ServerId::new("gdrive"), first)])
        .await;
    assert_eq!(registry.tool_count(), 2);

    let second: Arc<dyn ToolSource> = Arc::new(StaticSource::new("gdrive", Vec::new()));
    introspector
        .scan_all(&registry, vec![(ServerId::new("gdrive"), second)])
        .await;
    assert_eq!(registry.tool_count(), 0);
    assert_eq!(registry.servers().len(), 1);
}

#[tokio::test]
async fn test_stdio_source_missing_binary() {
    let config = ServerConfig::builder()
        .command("/nonexistent/mcp-server-nothing")
        .try_build()
        .unwrap();
    let source = StdioSource::new(config);

    let err = Introspector::new()
        .scan(ServerId::new("nothing"), &source)
        .await
        .unwrap_err();
    assert!(err.is_connection_error());
}

#[test]
fn test_derive_server_id_from_config() {
    let config = ServerConfig::builder()
        .command("npx")
        .args(["-y", "@modelcontextprotocol/server-gdrive"])
        .try_build()
        .unwrap();
    assert_eq!(derive_server_id(&config), ServerId::new("gdrive"));
}
