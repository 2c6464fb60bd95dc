//! CLI-specific value types.
//!
//! Strong types for output selection, process exit status and the
//! `--env KEY=VALUE` / `--name` arguments, shared between the binary and its
//! tests.
//!
//! # Examples
//!
//! ```
//! use mcp_toolgen_core::cli::{ExitCode, OutputFormat, parse_env_pair};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
//!
//! let (key, value) = parse_env_pair("TOKEN=abc=def").unwrap();
//! assert_eq!((key.as_str(), value.as_str()), ("TOKEN", "abc=def"));
//! ```

use crate::{Error, Result, ServerId};
use std::fmt;
use std::str::FromStr;

/// Longest accepted explicit server id.
const MAX_SERVER_ID_LEN: usize = 128;

/// CLI output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Pretty-printed output with colors for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::InvalidArgument(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// CLI exit code with semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Server connection or communication error (exit code 3).
    pub const SERVER_ERROR: Self = Self(3);

    /// At least one server failed to generate while others succeeded (exit code 4).
    pub const PARTIAL_FAILURE: Self = Self(4);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Picks the exit code for an error from the library.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_toolgen_core::cli::ExitCode;
    /// use mcp_toolgen_core::Error;
    ///
    /// let err = Error::InvalidArgument("bad".into());
    /// assert_eq!(ExitCode::for_error(&err), ExitCode::INVALID_INPUT);
    /// ```
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        match error {
            Error::InvalidArgument(_) | Error::ConfigError { .. } | Error::NotFound { .. } => {
                Self::INVALID_INPUT
            }
            Error::ConnectionFailed { .. }
            | Error::ExecutionError { .. }
            | Error::ToolCallFailed { .. } => Self::SERVER_ERROR,
            _ => Self::ERROR,
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a `KEY=VALUE` pair; the value may itself contain `=`.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if there is no `=` or the key is empty.
pub fn parse_env_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidArgument(format!(
            "invalid environment variable '{pair}' (expected KEY=VALUE)"
        ))),
    }
}

/// Validates an explicit server id given on the command line.
///
/// Only alphanumeric characters, `-`, `_` and `.` are accepted so the id can
/// be used in qualified names and log lines without quoting.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the id is empty, too long, or
/// contains other characters.
///
/// # Examples
///
/// ```
/// use mcp_toolgen_core::cli::parse_server_id;
///
/// assert_eq!(parse_server_id(" github ").unwrap().as_str(), "github");
/// assert!(parse_server_id("git hub").is_err());
/// assert!(parse_server_id("").is_err());
/// ```
pub fn parse_server_id(raw: &str) -> Result<ServerId> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("server id cannot be empty".to_string()));
    }

    if trimmed.len() > MAX_SERVER_ID_LEN {
        return Err(Error::InvalidArgument(format!(
            "server id too long (max {MAX_SERVER_ID_LEN} characters)"
        )));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(Error::InvalidArgument(format!(
            "server id '{trimmed}' contains invalid characters (allowed: a-z, A-Z, 0-9, -, _, .)"
        )));
    }

    Ok(ServerId::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trip() {
        for format in [OutputFormat::Json, OutputFormat::Text, OutputFormat::Pretty] {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_output_format_case_insensitive() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_invalid() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
    }

    #[test]
    fn test_exit_code_for_error() {
        let err = Error::ConnectionFailed {
            server: "s".into(),
            source: "refused".into(),
        };
        assert_eq!(ExitCode::for_error(&err), ExitCode::SERVER_ERROR);

        let err = Error::OutputConflict {
            path: "x".into(),
        };
        assert_eq!(ExitCode::for_error(&err), ExitCode::ERROR);
    }

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::PARTIAL_FAILURE), 4);
        assert!(ExitCode::default().is_success());
    }

    #[test]
    fn test_parse_env_pair_errors() {
        assert!(parse_env_pair("NOEQUALS").is_err());
        assert!(parse_env_pair("=value").is_err());
        assert_eq!(
            parse_env_pair("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_server_id_length() {
        assert!(parse_server_id(&"a".repeat(MAX_SERVER_ID_LEN)).is_ok());
        assert!(parse_server_id(&"a".repeat(MAX_SERVER_ID_LEN + 1)).is_err());
    }
}
