use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use graphite_exporter::config::GraphiteConfig;
use graphite_exporter::server::{self, AppState};
use graphite_exporter::GraphiteBackend;

#[tokio::main]
async fn main() {
    // ── 1. Logging ──────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 2. Configuration ────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => GraphiteConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("cannot load config {path}: {e}");
            std::process::exit(1);
        }),
        None => GraphiteConfig::default(),
    };

    // ── 3. Backend task ─────────────────────────────────────────
    let backend = GraphiteBackend::new(&config);
    let status = backend.status();
    let (signals, receiver) = mpsc::channel(config.queue_size);
    tokio::spawn(backend.run(receiver));

    // ── 4. Admin surface ────────────────────────────────────────
    let state = Arc::new(AppState { signals, status });
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.admin_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("cannot bind admin address {}: {e}", config.admin_addr);
            std::process::exit(1);
        });

    tracing::info!(
        admin = %config.admin_addr,
        collector = %format!("{}:{}", config.graphite_host, config.graphite_port),
        "graphite exporter up",
    );

    axum::serve(listener, app)
        .await
        .expect("admin server exited with error");
}
