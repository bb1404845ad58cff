use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ─── Configuration ───────────────────────────────────────────────

/// Exporter configuration, read once at startup.  Keys follow the
/// camelCase convention of the original daemon's config files, and every
/// field has a default so an empty `{}` is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphiteConfig {
    /// Carbon collector host.
    pub graphite_host: String,
    /// Carbon plaintext listener port.
    pub graphite_port: u16,
    /// Bind address for the admin HTTP surface.
    pub admin_addr: String,
    /// Leading segment on every exported name.
    pub global_prefix: String,
    /// Namespace segment for the exporter's own lines (`numStats` etc.).
    pub prefix_stats: String,
    pub prefix_counter: String,
    pub prefix_timer: String,
    pub prefix_gauge: String,
    pub prefix_set: String,
    /// Flat naming layout kept for dashboards built against old installs.
    pub legacy_namespace: bool,
    /// Advisory flush cadence hint, milliseconds.  The actual cadence is
    /// whatever the upstream scheduler delivers.
    pub flush_interval: u64,
    /// Bound on queued flush signals; beyond it, signals are dropped.
    pub queue_size: usize,
    /// Deadline for one connect-write-close cycle to the collector.
    pub send_timeout_ms: u64,
}

impl Default for GraphiteConfig {
    fn default() -> Self {
        Self {
            graphite_host: "127.0.0.1".to_string(),
            graphite_port: 2003,
            admin_addr: "0.0.0.0:8126".to_string(),
            global_prefix: "stats".to_string(),
            prefix_stats: "statsd".to_string(),
            prefix_counter: "counters".to_string(),
            prefix_timer: "timers".to_string(),
            prefix_gauge: "gauges".to_string(),
            prefix_set: "sets".to_string(),
            legacy_namespace: false,
            flush_interval: 10_000,
            queue_size: 16,
            send_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

impl GraphiteConfig {
    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────
