//! # cil_log
//!
//! A small structured logger: leveled, timestamped lines with key-value
//! fields, rendered as colorized text or JSON and written to any sink.
//!
//! ## Features
//!
//! - **Immutable contexts**: `with_field` returns a new logger, the parent is untouched
//! - **Two formats**: ANSI-colored text for humans, one JSON object per line for machines
//! - **Thread Safe**: one logger can be shared by a whole worker pool
//! - **Trace ids**: `*_ctx` methods attach a request's trace id for a single call
//!
//! ```
//! use cil_log::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder("OrderService")
//!     .format(OutputFormat::Json)
//!     .sink(sink.clone())
//!     .build();
//!
//! let ctx = TraceContext::new().with_trace_id("4f2a");
//! logger.with_field("order", 42).info_ctx(&ctx, "order processed");
//!
//! let line: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
//! assert_eq!(line["fields"]["trace_id"], "4f2a");
//! assert_eq!(line["fields"]["order"], 42);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        new_trace_id, trace_id_from_context, with_trace_id, FieldValue, Fields, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, Result, TraceContext,
    };
    pub use crate::sinks::{MemorySink, Sink};
}

pub use crate::core::{
    new_trace_id, trace_id_from_context, with_trace_id, FieldValue, Fields, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, Result, TraceContext,
    TIMESTAMP_LAYOUT, TRACE_ID_KEY,
};
pub use crate::sinks::{MemorySink, Sink};
