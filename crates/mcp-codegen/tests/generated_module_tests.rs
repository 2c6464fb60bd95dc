//! Type-checks a generated module.
//!
//! `fixtures/gdrive` is generator output checked in as source, so this test
//! crate only builds if the emitted code compiles. The first test keeps the
//! checked-in copy identical to what the generator produces today.

#[path = "fixtures/gdrive/mod.rs"]
mod gdrive;

use async_trait::async_trait;
use gdrive::tools::{GetDocumentFormat, ShareGrantee, ShareGranteeRole, ShareType};
use mcp_toolgen_codegen::ToolGenerator;
use mcp_toolgen_core::{RawTool, Result, ServerId, ToolSession};
use mcp_toolgen_introspector::StaticSource;
use mockall::mock;
use mockall::predicate::{always, eq};
use serde_json::{Map, Value, json};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

mock! {
    pub Session {}

    #[async_trait]
    impl ToolSession for Session {
        async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<Value>;
    }
}

fn source() -> StaticSource {
    StaticSource::new(
        "Google Drive",
        vec![
            RawTool {
                name: "get-document!".to_string(),
                description: Some("Fetch a document.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "document_id": {"type": "string", "description": "Document to fetch"},
                        "format": {"enum": ["markdown", "plain-text"]},
                        "revision": {"type": ["integer", "null"]},
                        "page_size": {"enum": [10, 50], "default": 10}
                    },
                    "required": ["document_id", "revision"]
                }),
            },
            RawTool {
                name: "share".to_string(),
                description: Some("Share a file with a user or group.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "client": {"type": "string"},
                        "type": {"enum": ["user", "group"]},
                        "self": {"type": "boolean"},
                        "grantee": {
                            "type": "object",
                            "properties": {
                                "email": {"type": "string"},
                                "expires": {"type": ["string", "null"]},
                                "role": {"enum": ["reader", "writer"]}
                            },
                            "required": ["email", "expires"]
                        }
                    },
                    "required": ["client", "grantee"]
                }),
            },
        ],
    )
}

/// Lines that carry code, without trailing whitespace.
fn significant_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect()
}

#[tokio::test]
async fn test_fixture_matches_generator_output() {
    let generator = ToolGenerator::new().unwrap();
    generator
        .scan_source(ServerId::new("gdrive"), &source())
        .await
        .unwrap();

    let temp = TempDir::new().unwrap();
    let report = generator.generate_code(temp.path(), false, None).unwrap();
    assert!(report.is_success());

    for (file, fixture) in [
        ("mod.rs", include_str!("fixtures/gdrive/mod.rs")),
        ("client.rs", include_str!("fixtures/gdrive/client.rs")),
        ("tools.rs", include_str!("fixtures/gdrive/tools.rs")),
    ] {
        let generated = fs::read_to_string(temp.path().join("gdrive").join(file)).unwrap();
        assert_eq!(
            significant_lines(&generated),
            significant_lines(fixture),
            "{file} no longer matches the generator"
        );
    }
}

#[tokio::test]
async fn test_stub_without_session_fails() {
    let client = gdrive::Client::new();
    assert!(!client.has_session());

    let err = gdrive::get_document_(
        &client,
        "doc-1".to_string(),
        None,
        Some(GetDocumentFormat::PlainText),
        Some(10),
    )
    .await
    .unwrap_err();
    assert!(err.is_session_not_initialized());
}

#[tokio::test]
async fn test_stub_sends_typed_arguments() {
    let mut session = MockSession::new();
    session
        .expect_call_tool()
        .with(eq("share"), always())
        .times(1)
        .returning(|_, args| Ok(Value::Object(args)));

    let client = gdrive::Client::new();
    client.set_session(Arc::new(session));

    let grantee = ShareGrantee {
        email: "ana@example.com".to_string(),
        expires: None,
        role: Some(ShareGranteeRole::Writer),
    };
    let sent = gdrive::share(
        &client,
        "web".to_string(),
        grantee,
        Some(ShareType::Group),
        None,
    )
    .await
    .unwrap();

    assert_eq!(
        sent,
        json!({
            "client": "web",
            "grantee": {"email": "ana@example.com", "expires": null, "role": "writer"},
            "type": "group"
        })
    );
}

#[tokio::test]
async fn test_required_nullable_argument_is_sent_as_null() {
    let mut session = MockSession::new();
    session
        .expect_call_tool()
        .with(eq("get-document!"), always())
        .times(1)
        .returning(|_, args| Ok(Value::Object(args)));

    let client = gdrive::Client::new();
    client.set_session(Arc::new(session));

    let sent = gdrive::get_document_(&client, "doc-1".to_string(), None, None, None)
        .await
        .unwrap();
    assert_eq!(sent, json!({"document_id": "doc-1", "revision": null}));
}
