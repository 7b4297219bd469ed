//! Log entry structure

use super::log_context::Fields;
use super::log_level::LogLevel;
use super::timestamp;
use serde::Serialize;

/// One log line before rendering
///
/// Field declaration order is the JSON key order: alphabetical, so JSON
/// lines come out byte-for-byte stable.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry<'a> {
    pub fields: &'a Fields,
    pub level: &'static str,
    pub message: &'a str,
    pub name: &'a str,
    pub time: String,
    #[serde(skip)]
    pub severity: Option<LogLevel>,
}

impl<'a> LogEntry<'a> {
    /// Create an entry stamped with the current local time
    pub fn new(level: LogLevel, name: &'a str, message: &'a str, fields: &'a Fields) -> Self {
        Self::at(level, timestamp::now(), name, message, fields)
    }

    /// Create an entry with an explicit, already formatted time
    pub fn at(
        level: LogLevel,
        time: String,
        name: &'a str,
        message: &'a str,
        fields: &'a Fields,
    ) -> Self {
        Self {
            fields,
            level: level.to_str(),
            message,
            name,
            time,
            severity: Some(level),
        }
    }

    /// Create an entry for a raw numeric severity, rendered `UNKNOWN` when out of range
    pub fn from_raw_level(raw: u8, name: &'a str, message: &'a str, fields: &'a Fields) -> Self {
        Self {
            fields,
            level: LogLevel::name_of(raw),
            message,
            name,
            time: timestamp::now(),
            severity: LogLevel::from_repr(raw),
        }
    }

    /// Escape sequence opening a text line for this entry
    pub fn ansi_prefix(&self) -> String {
        match self.severity {
            Some(level) => level.ansi_prefix(),
            None => super::log_level::RESET.to_string(),
        }
    }
}
