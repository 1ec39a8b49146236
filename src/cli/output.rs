//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::config::{Settings, mask_api_key};
use crate::error::{Error, QueryError};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats an assistant reply.
#[must_use]
pub fn format_reply(reply: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = reply.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ReplyOutput<'a> {
                reply: &'a str,
            }
            format_json_line(&ReplyOutput { reply })
        }
    }
}

/// Formats the settings with the API key masked.
#[must_use]
pub fn format_settings(settings: &Settings, path: &Path, format: OutputFormat) -> String {
    let masked = mask_api_key(&settings.api_key);
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Settings ({})", path.display());
            output.push_str(&"=".repeat(40));
            output.push('\n');
            let _ = writeln!(output, "  API key:       {masked}");
            let _ = writeln!(output, "  Model:         {}", settings.model);
            let _ = writeln!(output, "  Endpoint:      {}", settings.endpoint);
            let _ = writeln!(output, "  Context limit: {}", settings.context_limit);
            let _ = writeln!(output, "  Min interval:  {}s", settings.min_interval_secs);
            match settings.request_timeout_secs {
                Some(secs) => {
                    let _ = writeln!(output, "  Timeout:       {secs}s");
                }
                None => output.push_str("  Timeout:       none\n"),
            }
            let _ = writeln!(output, "  Role:          {}", settings.system_role);
            output
        }
        OutputFormat::Json => {
            let mut shown = settings.clone();
            shown.api_key = masked;
            #[derive(Serialize)]
            struct SettingsOutput<'a> {
                path: &'a Path,
                settings: &'a Settings,
            }
            format_json(&SettingsOutput {
                path,
                settings: &shown,
            })
        }
    }
}

/// Formats a confirmation message.
#[must_use]
pub fn format_message(message: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{message}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct MessageOutput<'a> {
                message: &'a str,
            }
            format_json_line(&MessageOutput { message })
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                kind: &'static str,
                message: String,
                #[serde(skip_serializing_if = "Option::is_none")]
                status: Option<u16>,
                #[serde(skip_serializing_if = "Option::is_none")]
                wait_ms: Option<u64>,
            }
            let status = match err {
                Error::Query(QueryError::UnsuccessfulStatus { status }) => Some(*status),
                _ => None,
            };
            let wait_ms = match err {
                Error::Throttled { wait_ms } => Some(*wait_ms),
                _ => None,
            };
            format_json_line(&ErrorOutput {
                kind: error_kind(err),
                message: err.to_string(),
                status,
                wait_ms,
            })
        }
    }
}

/// Returns a stable machine-readable name for an error.
#[must_use]
pub const fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::Query(query) => match query {
            QueryError::InvalidCredential => "invalid_credential",
            QueryError::TransportFailure { .. } => "transport_failure",
            QueryError::UnsuccessfulStatus { .. } => "unsuccessful_status",
            QueryError::PatternNotFound => "pattern_not_found",
            QueryError::Incomplete { .. } => "incomplete",
        },
        Error::Config(_) => "config",
        Error::Io(_) => "io",
        Error::Command(_) => "command",
        Error::Throttled { .. } => "throttled",
    }
}

/// Formats a value as pretty JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a value as one line of JSON.
fn format_json_line<T: Serialize>(value: &T) -> String {
    let mut line = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_format_reply() {
        assert_eq!(format_reply("hi", OutputFormat::Text), "hi\n");
        assert_eq!(format_reply("hi\n", OutputFormat::Text), "hi\n");
        assert_eq!(
            format_reply("say \"x\"", OutputFormat::Json),
            "{\"reply\":\"say \\\"x\\\"\"}\n"
        );
    }

    #[test]
    fn test_format_settings_masks_key() {
        let settings = Settings {
            api_key: "sk-secret-1234".to_string(),
            ..Settings::default()
        };
        let path = PathBuf::from("/tmp/settings.json");

        let text = format_settings(&settings, &path, OutputFormat::Text);
        assert!(text.contains("****1234"));
        assert!(!text.contains("sk-secret"));

        let json = format_settings(&settings, &path, OutputFormat::Json);
        assert!(json.contains("\"api_key\": \"****1234\""));
        assert!(json.contains("\"context_limit\": 3"));
    }

    #[test]
    fn test_format_error_json() {
        let err: Error = QueryError::UnsuccessfulStatus { status: 429 }.into();
        let json = format_error(&err, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "unsuccessful_status");
        assert_eq!(value["status"], 429);
        assert!(value.get("wait_ms").is_none());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(error_kind(&Error::Throttled { wait_ms: 5 }), "throttled");
        assert_eq!(
            error_kind(&QueryError::PatternNotFound.into()),
            "pattern_not_found"
        );
    }
}
