//! Output format configuration for log entries
//!
//! Provides the two line formats:
//! - Text: colorized, human-readable (default)
//! - Json: one compact object per line

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::RESET;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Environment variable consulted once when a logger is built
pub const ENV_VAR: &str = "ENV";

/// Value of [`ENV_VAR`] that selects JSON output
pub const PRODUCTION_ENV: &str = "prod";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `\x1b[32m[INFO] [2025-01-08 10:30:45] [Svc] user=7 | Request processed\x1b[0m`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"fields":{"user":7},"level":"INFO","message":"Request processed","name":"Svc","time":"2025-01-08 10:30:45"}`
    Json,
}

impl OutputFormat {
    /// Resolve the default format from the process environment
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(ENV_VAR).ok().as_deref())
    }

    /// Production mode selects JSON, anything else text
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(PRODUCTION_ENV) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    /// Render a log entry as one newline-terminated line
    pub fn format(&self, entry: &LogEntry<'_>) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(self.format_text(entry)),
            OutputFormat::Json => self.format_json(entry),
        }
    }

    /// Format as colorized text
    fn format_text(&self, entry: &LogEntry<'_>) -> String {
        let mut line = format!(
            "{}[{}] [{}] [{}]",
            entry.ansi_prefix(),
            entry.level,
            entry.time,
            entry.name
        );

        for (key, value) in entry.fields.iter() {
            let _ = write!(line, " {}={}", key, value);
        }

        let _ = writeln!(line, " | {}{}", entry.message, RESET);
        line
    }

    /// Format as JSON
    fn format_json(&self, entry: &LogEntry<'_>) -> Result<String> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        Ok(line)
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(LoggerError::config(
                "OutputFormat",
                format!("unknown format '{}'", s),
            )),
        }
    }
}
