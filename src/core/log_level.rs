//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ANSI sequence that ends a colored line
pub const RESET: &str = "\x1b[0m";

/// Name rendered for numeric levels outside the known range
pub const UNKNOWN_LEVEL: &str = "UNKNOWN";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum LogLevel {
    #[default]
    Debug = 0,
    Info = 1,
    Error = 2,
}

impl LogLevel {
    pub const ALL: [LogLevel; 3] = [LogLevel::Debug, LogLevel::Info, LogLevel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }

    /// Map a raw numeric severity back to a level
    pub fn from_repr(value: u8) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Debug),
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Name for a raw numeric severity, `UNKNOWN` when out of range
    pub fn name_of(value: u8) -> &'static str {
        Self::from_repr(value).map_or(UNKNOWN_LEVEL, |level| level.to_str())
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Cyan,
            LogLevel::Info => Green,
            LogLevel::Error => Red,
        }
    }

    /// Foreground escape sequence that opens a line at this level
    pub fn ansi_prefix(&self) -> String {
        format!("\x1b[{}m", self.color_code().to_fg_str())
    }

    /// Escape sequence for a raw numeric severity; unknown levels get the reset code
    pub fn ansi_prefix_of(value: u8) -> String {
        Self::from_repr(value).map_or_else(|| RESET.to_string(), |level| level.ansi_prefix())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(LoggerError::config(
                "LogLevel",
                format!("Invalid log level: '{}'", s),
            )),
        }
    }
}
