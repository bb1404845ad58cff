pub mod status;
pub mod transport;

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::config::GraphiteConfig;
use crate::render::{self, naming::NamespaceTable};
use crate::snapshot::MetricsSnapshot;

use status::StatusHandle;

// ─── Flush signal ────────────────────────────────────────────────

/// One flush trigger: the timestamp stamped on every line of the batch,
/// plus the aggregated snapshot to render.
#[derive(Debug)]
pub struct FlushSignal {
    pub timestamp: i64,
    pub snapshot: MetricsSnapshot,
}

// ─── Backend ─────────────────────────────────────────────────────

/// The Graphite export backend.  Each flush signal becomes one cycle:
/// render the snapshot into a batch, ship it over a fresh TCP connection,
/// record the outcome.  Failures never escape a cycle; the next signal
/// always starts a clean attempt.
pub struct GraphiteBackend {
    addr: String,
    namespaces: NamespaceTable,
    send_timeout: Duration,
    status: StatusHandle,
}

impl GraphiteBackend {
    pub fn new(config: &GraphiteConfig) -> Self {
        Self {
            addr: format!("{}:{}", config.graphite_host, config.graphite_port),
            namespaces: NamespaceTable::new(config),
            send_timeout: Duration::from_millis(config.send_timeout_ms),
            status: StatusHandle::new(),
        }
    }

    /// Handle for status queries; safe to use while a flush is running.
    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Runs one complete render-and-send cycle.  Taking `&mut self` keeps
    /// cycles serialized at the type level: two flushes on one backend can
    /// never interleave on the wire.
    pub async fn flush(&mut self, timestamp: i64, snapshot: &MetricsSnapshot) {
        let started = Instant::now();

        let mut batch = render::render(snapshot, timestamp, &self.namespaces);
        let calculation_ms = started.elapsed().as_secs_f64() * 1000.0;
        render::render_internal(&mut batch, snapshot, timestamp, &self.namespaces, calculation_ms);

        let bytes = batch.payload.len() as u64;
        match transport::send_batch(&self.addr, batch.payload.as_bytes(), self.send_timeout).await {
            Ok(()) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.status.record_success(Utc::now().timestamp(), bytes, elapsed_ms);
                tracing::debug!(
                    num_stats = batch.num_stats,
                    bytes,
                    elapsed_ms,
                    "flushed batch to collector",
                );
            }
            Err(err) => {
                self.status.record_failure(err.to_string());
                tracing::error!(error = %err, "flush cycle failed");
            }
        }
    }

    /// Drains flush signals until the sender side closes.  Owning the
    /// receiver here is what serializes cycles; a signal arriving while a
    /// cycle runs simply waits in the bounded queue.
    pub async fn run(mut self, mut signals: mpsc::Receiver<FlushSignal>) {
        while let Some(signal) = signals.recv().await {
            self.flush(signal.timestamp, &signal.snapshot).await;
        }
        tracing::debug!("flush channel closed, backend task exiting");
    }
}
