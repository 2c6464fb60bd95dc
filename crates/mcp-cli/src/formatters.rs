//! Output formatters for CLI commands.
//!
//! Every command builds a serializable summary and hands it to
//! [`format_output`]:
//!
//! - `json`: pretty-printed JSON, stable for scripts
//! - `text`: one `path: value` line per leaf, easy to `grep`
//! - `pretty`: indented and colorized for terminals

use anyhow::Result;
use colored::Colorize;
use mcp_toolgen_core::cli::OutputFormat;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Formats data according to the requested output format.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_cli::formatters::format_output;
/// use mcp_toolgen_core::cli::OutputFormat;
/// use serde_json::json;
///
/// let data = json!({"server_id": "gdrive", "tool_count": 2});
///
/// let text = format_output(&data, OutputFormat::Text)?;
/// assert_eq!(text, "server_id: gdrive\ntool_count: 2");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => {
            let mut lines = Vec::new();
            flatten(&serde_json::to_value(data)?, "", &mut lines);
            Ok(lines.join("\n"))
        }
        OutputFormat::Pretty => {
            let mut out = String::new();
            pretty(&serde_json::to_value(data)?, 0, &mut out);
            Ok(out.trim_end().to_string())
        }
    }
}

fn flatten(value: &Value, path: &str, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten(child, &child_path, lines);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, &format!("{path}[{index}]"), lines);
            }
        }
        Value::String(text) => lines.push(format!("{path}: {text}")),
        other => lines.push(format!("{path}: {other}")),
    }
}

fn pretty(value: &Value, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::Object(inner) if !inner.is_empty() => {
                        let _ = writeln!(out, "{pad}{}:", key.blue().bold());
                        pretty(child, indent + 1, out);
                    }
                    Value::Array(items) if !items.is_empty() => {
                        let _ = writeln!(out, "{pad}{} ({}):", key.blue().bold(), items.len());
                        pretty(child, indent + 1, out);
                    }
                    _ => {
                        let _ = writeln!(out, "{pad}{}: {}", key.blue().bold(), scalar(child));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        let _ = writeln!(out, "{pad}{}", "-".dimmed());
                        pretty(item, indent + 1, out);
                    }
                    _ => {
                        let _ = writeln!(out, "{pad}{} {}", "-".dimmed(), scalar(item));
                    }
                }
            }
        }
        other => {
            let _ = writeln!(out, "{pad}{}", scalar(other));
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Bool(b) => b.to_string().yellow().to_string(),
        Value::Number(n) => n.to_string().cyan().to_string(),
        Value::String(s) => s.green().to_string(),
        Value::Array(_) => "[]".dimmed().to_string(),
        Value::Object(_) => "{}".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Summary {
        server_id: String,
        files: Vec<String>,
        error: Option<String>,
    }

    fn summary() -> Summary {
        Summary {
            server_id: "gdrive".to_string(),
            files: vec!["out/gdrive/mod.rs".to_string(), "out/gdrive/tools.rs".to_string()],
            error: None,
        }
    }

    #[test]
    fn test_json_format() {
        let output = format_output(&summary(), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["server_id"], "gdrive");
        assert_eq!(parsed["files"][1], "out/gdrive/tools.rs");
    }

    #[test]
    fn test_text_format_flattens_paths() {
        let output = format_output(&summary(), OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "server_id: gdrive\n\
             files[0]: out/gdrive/mod.rs\n\
             files[1]: out/gdrive/tools.rs\n\
             error: null"
        );
    }

    #[test]
    fn test_text_format_nested_and_empty() {
        let data = json!({"servers": [{"id": "a", "skipped": []}], "meta": {}});
        let output = format_output(&data, OutputFormat::Text).unwrap();
        assert_eq!(output, "servers[0].id: a\nservers[0].skipped: []\nmeta: {}");
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = format_output(&summary(), OutputFormat::Pretty).unwrap();
        assert_eq!(
            output,
            "server_id: gdrive\n\
             files (2):\n  \
             - out/gdrive/mod.rs\n  \
             - out/gdrive/tools.rs\n\
             error: null"
        );
    }
}
