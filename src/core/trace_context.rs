//! Request-scoped trace identifiers
//!
//! A [`TraceContext`] is a small immutable value passed explicitly to the
//! `*_ctx` logging methods. It either carries a trace id or it doesn't; in
//! the latter case a fresh id is generated for the call.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Field key the trace id is logged under
pub const TRACE_ID_KEY: &str = "trace_id";

static LAST_TRACE_NANOS: AtomicU64 = AtomicU64::new(0);

/// Generate a trace id from the wall clock, base-36 encoded
///
/// Ids are strictly increasing within a process: when two calls land on the
/// same clock tick the later one is bumped by a nanosecond.
pub fn new_trace_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or_default();

    let mut last = LAST_TRACE_NANOS.load(Ordering::Relaxed);
    let nanos = loop {
        let next = now.max(last.saturating_add(1));
        match LAST_TRACE_NANOS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break next,
            Err(current) => last = current,
        }
    };

    to_base36(nanos)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Context carrying an optional trace identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl TraceContext {
    /// An empty context with no trace id attached
    pub fn new() -> Self {
        Self { trace_id: None }
    }

    /// Return a copy of this context carrying `trace_id`
    #[must_use]
    pub fn with_trace_id(&self, trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
        }
    }

    /// The stored trace id, if any
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// The stored trace id, or a freshly generated one
    pub fn trace_id_or_new(&self) -> String {
        self.trace_id.clone().unwrap_or_else(new_trace_id)
    }
}

/// Attach `trace_id` to a copy of `ctx`
pub fn with_trace_id(ctx: &TraceContext, trace_id: impl Into<String>) -> TraceContext {
    ctx.with_trace_id(trace_id)
}

/// Stored trace id of `ctx`, or a fresh one; never fails
pub fn trace_id_from_context(ctx: &TraceContext) -> String {
    ctx.trace_id_or_new()
}
