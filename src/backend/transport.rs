use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// A failed attempt to ship one batch.  Caught by the flush cycle and
/// surfaced through the status record; never propagated past the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connecting to {addr}: {source}")]
    Connect { addr: String, source: io::Error },
    #[error("writing batch to {addr}: {source}")]
    Write { addr: String, source: io::Error },
    #[error("sending to {addr} timed out after {after:?}")]
    Timeout { addr: String, after: Duration },
}

/// Ships one rendered batch: connect, a single write of the whole
/// payload, shutdown.  The connection lives exactly as long as this call,
/// on every exit path — there is no pooling across cycles.
pub async fn send_batch(addr: &str, payload: &[u8], deadline: Duration) -> Result<(), TransportError> {
    let attempt = async {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::Connect { addr: addr.to_string(), source })?;
        stream
            .write_all(payload)
            .await
            .map_err(|source| TransportError::Write { addr: addr.to_string(), source })?;
        stream
            .shutdown()
            .await
            .map_err(|source| TransportError::Write { addr: addr.to_string(), source })?;
        Ok(())
    };

    match tokio::time::timeout(deadline, attempt).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout { addr: addr.to_string(), after: deadline }),
    }
}

// ─── Tests ───────────────────────────────────────────────────────
