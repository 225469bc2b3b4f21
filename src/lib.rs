pub mod advisor;
pub mod api;
pub mod config;
pub mod gemini;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::advisor::AdvisorController;
use crate::gemini::GeminiClient;

/// Initialize tracing, build the controller, and serve until Ctrl-C.
pub async fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let gemini_config = config::GeminiConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("Configuration error: {e}");
        std::process::exit(1);
    });
    let addr = config::bind_addr().unwrap_or_else(|e| {
        tracing::error!("Configuration error: {e}");
        std::process::exit(1);
    });

    let client = Arc::new(GeminiClient::new(&gemini_config).unwrap_or_else(|e| {
        tracing::error!("Failed to build Gemini client: {e}");
        std::process::exit(1);
    }));
    tracing::info!(model = %gemini_config.model, "Gemini client ready");

    let controller = Arc::new(AdvisorController::new(client));

    let handle = api::server::start_server(addr, controller)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to start server: {e}");
            std::process::exit(1);
        });
    tracing::info!("Open http://{} in your browser", handle.addr);

    tokio::signal::ctrl_c()
        .await
        .expect("error while running Health Advisor");
    tracing::info!("Shutting down");
    handle.shutdown().await;
}
