//! Core logger types

pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod timestamp;
pub mod trace_context;

pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, Fields};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use timestamp::TIMESTAMP_LAYOUT;
pub use trace_context::{new_trace_id, trace_id_from_context, with_trace_id, TraceContext, TRACE_ID_KEY};
