//! Main logger implementation

use super::{
    error::Result,
    log_context::{FieldValue, Fields},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    trace_context::{TraceContext, TRACE_ID_KEY},
};
use crate::sinks::Sink;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Mutable configuration of one logger, guarded by its lock
#[derive(Debug, Clone)]
struct LoggerState {
    level: LogLevel,
    format: OutputFormat,
    sink: Sink,
    fields: Fields,
}

/// A named, leveled, structured logger
///
/// Loggers are shared across threads by reference or `Arc`. Attaching fields
/// with [`Logger::with_field`] returns a new logger and leaves the receiver
/// untouched; the two are independent from then on, apart from writing to
/// the same sink and counting into the same [`LoggerMetrics`].
pub struct Logger {
    name: Arc<str>,
    state: RwLock<LoggerState>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a logger at `Debug` level writing to stdout
    ///
    /// The format is JSON when the `ENV` variable is `prod`, text otherwise.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        LoggerBuilder::new(name).build()
    }

    /// Component name shared by this logger and its forks
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum level currently written
    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    /// Current line format
    pub fn format(&self) -> OutputFormat {
        self.state.read().format
    }

    /// Snapshot of this logger's fields
    pub fn fields(&self) -> Fields {
        self.state.read().fields.clone()
    }

    /// Handle to the current sink
    pub fn sink(&self) -> Sink {
        self.state.read().sink.clone()
    }

    /// Get the logger metrics for this logger family
    ///
    /// # Example
    ///
    /// ```
    /// use cil_log::{Logger, MemorySink};
    ///
    /// let logger = Logger::new("metrics");
    /// logger.set_output(MemorySink::new());
    /// logger.info("hello");
    ///
    /// assert_eq!(logger.metrics().total_logged(), 1);
    /// assert_eq!(logger.metrics().dropped_count(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Set the minimum level for this logger only
    pub fn set_level(&self, level: LogLevel) {
        self.state.write().level = level;
    }

    /// Switch this logger between text and JSON lines
    pub fn set_format(&self, format: OutputFormat) {
        self.state.write().format = format;
    }

    /// Redirect future lines to `writer`
    pub fn set_output<W>(&self, writer: W)
    where
        W: Write + Send + 'static,
    {
        self.set_sink(Sink::from_writer(writer));
    }

    /// Redirect future lines to an existing sink handle
    pub fn set_sink(&self, sink: impl Into<Sink>) {
        let sink = sink.into();
        self.state.write().sink = sink;
    }

    /// Fork a logger carrying one extra field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Logger
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fork(Fields::new().with_field(key, value))
    }

    /// Fork a logger carrying extra fields; supplied keys replace existing ones
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fork(fields.into_iter().collect())
    }

    fn fork(&self, overlay: Fields) -> Logger {
        let mut state = self.state.read().clone();
        state.fields.merge(overlay);

        Logger {
            name: Arc::clone(&self.name),
            state: RwLock::new(state),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Whether a call at `level` would be written
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.state.read().level
    }

    /// Log a message at `level`; a no-op below the configured level
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), None);
    }

    /// Log with the trace id of `ctx` attached as `trace_id` for this call only
    pub fn log_ctx(&self, ctx: &TraceContext, level: LogLevel, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), Some(ctx));
    }

    /// Render under the read lock, write after releasing it
    fn emit(&self, level: LogLevel, message: &str, ctx: Option<&TraceContext>) {
        let (rendered, sink) = {
            let state = self.state.read();
            if level < state.level {
                return;
            }

            let fields = match ctx {
                Some(ctx) => {
                    let mut fields = state.fields.clone();
                    fields.insert(TRACE_ID_KEY, ctx.trace_id_or_new());
                    Cow::Owned(fields)
                }
                None => Cow::Borrowed(&state.fields),
            };

            let entry = LogEntry::new(level, &self.name, message, &fields);
            (state.format.format(&entry), state.sink.clone())
        };

        let line = match rendered {
            Ok(line) => line,
            Err(_) => {
                self.metrics.record_dropped();
                return;
            }
        };

        match sink.write_line(&line) {
            Ok(()) => self.metrics.record_logged(),
            Err(_) => self.metrics.record_write_failure(),
        };
    }

    /// Log at debug level
    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level
    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    /// Log at error level
    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Log at debug level with the trace id of `ctx`
    #[inline]
    pub fn debug_ctx(&self, ctx: &TraceContext, message: impl AsRef<str>) {
        self.log_ctx(ctx, LogLevel::Debug, message);
    }

    /// Log at info level with the trace id of `ctx`
    #[inline]
    pub fn info_ctx(&self, ctx: &TraceContext, message: impl AsRef<str>) {
        self.log_ctx(ctx, LogLevel::Info, message);
    }

    /// Log at error level with the trace id of `ctx`
    #[inline]
    pub fn error_ctx(&self, ctx: &TraceContext, message: impl AsRef<str>) {
        self.log_ctx(ctx, LogLevel::Error, message);
    }

    /// Flush the current sink
    ///
    /// Unlike the logging calls, this reports the I/O error.
    pub fn flush(&self) -> Result<()> {
        let sink = self.sink();
        sink.flush()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use cil_log::prelude::*;
    ///
    /// let logger = Logger::builder("orders")
    ///     .level(LogLevel::Info)
    ///     .format(OutputFormat::Json)
    ///     .field("region", "eu-west-1")
    ///     .build();
    ///
    /// assert_eq!(logger.level(), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl Clone for Logger {
    /// Fork with no extra fields
    fn clone(&self) -> Self {
        self.fork(Fields::new())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &state.level)
            .field("format", &state.format)
            .field("sink", &state.sink)
            .field("fields", &state.fields)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// The default format is resolved from the environment once, when the
/// builder is created.
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    format: OutputFormat,
    sink: Option<Sink>,
    fields: Fields,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Debug,
            format: OutputFormat::from_env(),
            sink: None,
            fields: Fields::new(),
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the line format, overriding the environment default
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to an existing sink handle
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: impl Into<Sink>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    /// Write to `writer`
    #[must_use = "builder methods return a new value"]
    pub fn output<W>(self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.sink(Sink::from_writer(writer))
    }

    /// Add an initial field
    #[must_use = "builder methods return a new value"]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key, value);
        self
    }

    /// Add initial fields
    #[must_use = "builder methods return a new value"]
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.extend(fields);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            name: self.name.into(),
            state: RwLock::new(LoggerState {
                level: self.level,
                format: self.format,
                sink: self.sink.unwrap_or_default(),
                fields: self.fields,
            }),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::io;

    fn captured(name: &str) -> (Logger, MemorySink) {
        let memory = MemorySink::new();
        let logger = Logger::builder(name)
            .format(OutputFormat::Text)
            .output(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_logger_defaults() {
        let logger = Logger::builder("Svc").build();

        assert_eq!(logger.name(), "Svc");
        assert_eq!(logger.level(), LogLevel::Debug);
        assert!(logger.fields().is_empty());
        assert_eq!(logger.sink().name(), "stdout");
    }

    #[test]
    fn test_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }

    #[test]
    fn test_level_gate() {
        let (logger, memory) = captured("Svc");
        logger.set_level(LogLevel::Info);

        logger.debug("x");
        assert!(memory.is_empty());

        logger.info("y");
        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[INFO]"));
        assert!(lines[0].contains("[Svc]"));
        assert!(lines[0].contains("| y"));
    }

    #[test]
    fn test_is_enabled() {
        let (logger, _memory) = captured("Svc");
        logger.set_level(LogLevel::Error);

        assert!(!logger.is_enabled(LogLevel::Info));
        assert!(logger.is_enabled(LogLevel::Error));
    }

    #[test]
    fn test_with_field_leaves_parent_untouched() {
        let (parent, memory) = captured("Svc");
        let child = parent.with_field("user", 7);

        assert!(parent.fields().is_empty());
        assert_eq!(child.fields().get("user"), Some(&FieldValue::Int(7)));

        parent.info("parent");
        child.info("child");

        let lines = memory.lines();
        assert!(!lines[0].contains("user="));
        assert!(lines[1].contains("user=7"));
    }

    #[test]
    fn test_fork_configuration_is_independent() {
        let (parent, _memory) = captured("Svc");
        let child = parent.with_field("k", "v");

        child.set_level(LogLevel::Error);
        assert_eq!(parent.level(), LogLevel::Debug);

        parent.set_format(OutputFormat::Json);
        assert_eq!(child.format(), OutputFormat::Text);

        parent.set_output(io::sink());
        assert_eq!(child.sink().name(), "writer");
        assert!(!child.sink().same_as(&parent.sink()));
    }

    #[test]
    fn test_fork_copies_current_values() {
        let (parent, _memory) = captured("Svc");
        parent.set_level(LogLevel::Info);

        let child = parent.clone();
        assert_eq!(child.level(), LogLevel::Info);
        assert!(child.sink().same_as(&parent.sink()));
    }

    #[test]
    fn test_with_fields_overlay_wins() {
        let (parent, _memory) = captured("Svc");
        let parent = parent.with_fields([("a", 1), ("b", 2)]);
        let child = parent.with_fields([("b", 20), ("c", 30)]);

        assert_eq!(child.fields().format_fields(), "a=1 b=20 c=30");
        assert_eq!(parent.fields().format_fields(), "a=1 b=2");
    }

    #[test]
    fn test_ctx_logging_adds_trace_id_once() {
        let (logger, memory) = captured("Svc");
        let ctx = TraceContext::new().with_trace_id("abc123");

        logger.info_ctx(&ctx, "traced");
        logger.info("plain");

        let lines = memory.lines();
        assert!(lines[0].contains("trace_id=abc123"));
        assert!(!lines[1].contains("trace_id"));
        assert!(!logger.fields().contains_key("trace_id"));
    }

    #[test]
    fn test_ctx_logging_generates_missing_trace_id() {
        let (logger, memory) = captured("Svc");
        logger.error_ctx(&TraceContext::new(), "untraced");

        let line = &memory.lines()[0];
        let id = line
            .split("trace_id=")
            .nth(1)
            .and_then(|rest| rest.split(' ').next())
            .unwrap();
        assert!(!id.is_empty());
    }

    #[test]
    fn test_ctx_logging_respects_level() {
        let (logger, memory) = captured("Svc");
        logger.set_level(LogLevel::Error);

        logger.debug_ctx(&TraceContext::new(), "hidden");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_json_serialization_failure_drops_line() {
        let (logger, memory) = captured("Svc");
        logger.set_format(OutputFormat::Json);

        logger.with_field("ratio", f64::NAN).info("lost");

        assert!(memory.is_empty());
        assert_eq!(logger.metrics().dropped_count(), 1);
        assert_eq!(logger.metrics().total_logged(), 0);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            }
        }

        let logger = Logger::builder("Svc").output(Broken).build();
        logger.info("nowhere");
        logger.error("nowhere");

        assert_eq!(logger.metrics().write_failures(), 2);
        assert!(logger.flush().is_err());
    }

    #[test]
    fn test_metrics_shared_with_forks() {
        let (logger, _memory) = captured("Svc");
        logger.with_field("req", 1).info("a");
        logger.with_field("req", 2).info("b");

        assert_eq!(logger.metrics().total_logged(), 2);
    }

    #[test]
    fn test_builder_full_configuration() {
        let memory = MemorySink::new();
        let logger = Logger::builder("Svc")
            .level(LogLevel::Info)
            .format(OutputFormat::Json)
            .sink(memory.clone())
            .field("env", "test")
            .fields([("zone", "a")])
            .build();

        logger.info("ok");

        let parsed: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
        assert_eq!(parsed["fields"]["env"], "test");
        assert_eq!(parsed["fields"]["zone"], "a");
        assert_eq!(logger.sink().name(), "memory");
    }
}
