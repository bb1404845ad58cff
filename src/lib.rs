//! A Graphite export backend: receives snapshots of already-aggregated
//! statistics (counters, gauges, timer aggregates, set cardinalities),
//! renders each one into the Graphite plaintext protocol, ships the batch
//! to a carbon collector over one TCP connection per flush cycle, and
//! tracks its own operational health for on-demand status queries.
//!
//! Data flow: a [`backend::FlushSignal`] carrying `(timestamp, snapshot)`
//! drives [`render`] → [`backend::transport`], and the outcome lands in
//! the backend's [`backend::status::StatusHandle`].  The binary wires
//! these up behind a small admin HTTP surface ([`server`]).

pub mod backend;
pub mod config;
pub mod render;
pub mod server;
pub mod snapshot;

pub use backend::{FlushSignal, GraphiteBackend};
pub use config::GraphiteConfig;
pub use snapshot::MetricsSnapshot;
