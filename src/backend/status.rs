use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Identifier this backend reports under in status queries.
pub const BACKEND_ID: &str = "graphite";

// ─── Status record ───────────────────────────────────────────────

/// Operational health of one backend instance.  Always describes the most
/// recently *completed* cycle — a cycle in progress is never visible here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusRecord {
    /// Unix timestamp of the last successful flush.
    pub last_flush: i64,
    /// Description of the last failed cycle, if any.
    pub last_exception: Option<String>,
    /// Wall-clock duration of the last successful flush, milliseconds.
    pub flush_time: f64,
    /// Byte length of the last successfully shipped batch.
    pub flush_length: u64,
}

/// The value of one tracked status counter.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    Timestamp(i64),
    Exception(Option<String>),
    Millis(f64),
    Bytes(u64),
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::Exception(Some(description)) => write!(f, "{description}"),
            Self::Exception(None) => write!(f, "none"),
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Bytes(bytes) => write!(f, "{bytes}"),
        }
    }
}

// ─── Handle ──────────────────────────────────────────────────────

/// Cheaply cloneable view of a backend's health counters.
/// The flush cycle writes through it; status queries read through it.
/// Each update locks once and writes every field, so a concurrent query
/// can never observe a half-updated record, and a query never touches
/// the network.
#[derive(Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<StatusRecord>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a successful cycle as one atomic update.
    pub(crate) fn record_success(&self, timestamp: i64, bytes: u64, elapsed_ms: f64) {
        let mut record = self.inner.lock();
        record.last_flush = timestamp;
        record.last_exception = None;
        record.flush_time = elapsed_ms;
        record.flush_length = bytes;
    }

    /// Records a failed cycle.  The success counters keep the values of
    /// the last cycle that did complete.
    pub(crate) fn record_failure(&self, description: String) {
        self.inner.lock().last_exception = Some(description);
    }

    /// A point-in-time copy of the whole record.
    pub fn snapshot(&self) -> StatusRecord {
        self.inner.lock().clone()
    }

    /// Invokes `sink` exactly once per tracked counter, in a fixed order.
    pub fn report<F>(&self, mut sink: F)
    where
        F: FnMut(&'static str, &'static str, StatusValue),
    {
        let record = self.snapshot();
        sink(BACKEND_ID, "last_flush", StatusValue::Timestamp(record.last_flush));
        sink(BACKEND_ID, "last_exception", StatusValue::Exception(record.last_exception));
        sink(BACKEND_ID, "flush_time", StatusValue::Millis(record.flush_time));
        sink(BACKEND_ID, "flush_length", StatusValue::Bytes(record.flush_length));
    }
}

// ─── Tests ───────────────────────────────────────────────────────
