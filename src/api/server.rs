//! Server lifecycle — bind, spawn, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel. `run()` keeps the handle alive until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::advisor::AdvisorController;
use crate::api::router::advisor_router;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to read local address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    finished_rx: Option<oneshot::Receiver<()>>,
}

impl ServerHandle {
    /// Signal shutdown and wait for the server task to drain.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(rx) = self.finished_rx.take() {
            let _ = rx.await;
        }
    }
}

/// Bind the advisor server and serve it in a background task.
///
/// Port 0 binds ephemerally; the resolved address is on the handle.
pub async fn start_server(
    addr: SocketAddr,
    controller: Arc<AdvisorController>,
) -> Result<ServerHandle, ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(ServeError::LocalAddr)?;

    let app = advisor_router(controller);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (finished_tx, finished_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%local_addr, "Health advisor listening");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
        let _ = finished_tx.send(());
    });

    Ok(ServerHandle {
        addr: local_addr,
        shutdown_tx: Some(shutdown_tx),
        finished_rx: Some(finished_rx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{HealthAdvice, MockAdviceClient};

    fn test_controller() -> Arc<AdvisorController> {
        Arc::new(AdvisorController::new(Arc::new(
            MockAdviceClient::succeeding(HealthAdvice {
                summary: "ok".to_string(),
                possible_causes: vec![],
                recommendations: vec![],
                seek_doctor_if: vec![],
            }),
        )))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn binds_ephemeral_port_and_shuts_down() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let handle = start_server(addr, test_controller()).await.unwrap();
        assert_ne!(handle.addr.port(), 0);

        // Round-trip through a real socket.
        let url = format!("http://{}/api/health", handle.addr);
        let body = tokio::task::spawn_blocking(move || {
            reqwest::blocking::get(&url).and_then(|r| r.text())
        })
        .await
        .unwrap()
        .unwrap();
        assert!(body.contains("\"ok\""));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let first = start_server(addr, test_controller()).await.unwrap();

        // Second bind on the same concrete port must fail.
        let taken = first.addr;
        let result = start_server(taken, test_controller()).await;
        assert!(matches!(result, Err(ServeError::Bind { .. })));

        first.shutdown().await;
    }
}
