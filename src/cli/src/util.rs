//! Small helpers for command input and display.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::InputError;

/// True when `s` parses as a JSON object or array. Scalars, `null` and
/// malformed text are rejected.
pub fn is_json_string(s: &str) -> bool {
    parse_structured(s).is_some()
}

fn parse_structured(s: &str) -> Option<Value> {
    serde_json::from_str::<Value>(s)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

/// Resolve the output schema from `--schema` or `--schema-file`.
pub fn load_schema(
    inline: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<Value>, InputError> {
    match (inline, file) {
        (Some(_), Some(_)) => Err(InputError::ConflictingSchemaSources),
        (Some(raw), None) => parse_structured(raw)
            .map(Some)
            .ok_or(InputError::InvalidSchema),
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path).map_err(|source| InputError::SchemaFile {
                path: path.to_path_buf(),
                source,
            })?;
            parse_structured(&raw)
                .map(Some)
                .ok_or_else(|| InputError::InvalidSchemaFile {
                    path: path.to_path_buf(),
                })
        }
        (None, None) => Ok(None),
    }
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS UTC`. Anything else is
/// returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Strings print raw, everything else as pretty JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
