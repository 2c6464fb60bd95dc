//! Tool stubs for the `gdrive` MCP server.
// Generated by mcp-toolgen. Do not edit.
#![allow(
    dead_code,
    unused_imports,
    non_camel_case_types,
    non_snake_case,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

use super::client::Client;
use mcp_toolgen_core::serde::{Deserialize, Serialize};
use mcp_toolgen_core::serde_json::{Map, Value};
use mcp_toolgen_core::{Arguments, Result};

/// Allowed values: `"markdown"`, `"plain-text"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(crate = "mcp_toolgen_core::serde")]
pub enum GetDocumentFormat {
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "plain-text")]
    PlainText,
}

/// Allowed values: `"reader"`, `"writer"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(crate = "mcp_toolgen_core::serde")]
pub enum ShareGranteeRole {
    #[serde(rename = "reader")]
    Reader,
    #[serde(rename = "writer")]
    Writer,
}

/// Allowed values: `"user"`, `"group"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(crate = "mcp_toolgen_core::serde")]
pub enum ShareType {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "group")]
    Group,
}

/// `share_grantee` argument record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(crate = "mcp_toolgen_core::serde")]
pub struct ShareGrantee {
    pub email: String,
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ShareGranteeRole>,
}

/// Fetch a document.
///
/// Calls the MCP tool `get-document!`.
///
/// # Arguments
///
/// * `document_id` - Document to fetch
/// * `revision` -
/// * `format` -
/// * `page_size` - Allowed values: `10`, `50`. Defaults to `10`.
pub async fn get_document_(client: &Client, document_id: String, revision: Option<i64>, format: Option<GetDocumentFormat>, page_size: Option<i64>) -> Result<Value> {
    const INPUT_SCHEMA: &str = "{\"type\":\"object\",\"properties\":{\"document_id\":{\"type\":\"string\",\"description\":\"Document to fetch\"},\"format\":{\"enum\":[\"markdown\",\"plain-text\"]},\"revision\":{\"type\":[\"integer\",\"null\"]},\"page_size\":{\"enum\":[10,50],\"default\":10}},\"required\":[\"document_id\",\"revision\"]}";
    let arguments = Arguments::new()
        .required("document_id", document_id)?
        .required("revision", revision)?
        .optional("format", format)?
        .optional("page_size", page_size)?;
    client.call("get-document!", INPUT_SCHEMA, arguments).await
}

/// Share a file with a user or group.
///
/// Calls the MCP tool `share`.
///
/// # Arguments
///
/// * `client_2` -
/// * `grantee` -
/// * `type_` -
/// * `self_` -
pub async fn share(client: &Client, client_2: String, grantee: ShareGrantee, type_: Option<ShareType>, self_: Option<bool>) -> Result<Value> {
    const INPUT_SCHEMA: &str = "{\"type\":\"object\",\"properties\":{\"client\":{\"type\":\"string\"},\"type\":{\"enum\":[\"user\",\"group\"]},\"self\":{\"type\":\"boolean\"},\"grantee\":{\"type\":\"object\",\"properties\":{\"email\":{\"type\":\"string\"},\"expires\":{\"type\":[\"string\",\"null\"]},\"role\":{\"enum\":[\"reader\",\"writer\"]}},\"required\":[\"email\",\"expires\"]}},\"required\":[\"client\",\"grantee\"]}";
    let arguments = Arguments::new()
        .required("client", client_2)?
        .required("grantee", grantee)?
        .optional("type", type_)?
        .optional("self", self_)?;
    client.call("share", INPUT_SCHEMA, arguments).await
}
