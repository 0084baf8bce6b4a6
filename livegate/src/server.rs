//! Server lifecycle management
//!
//! Binds the HTTP listener, serves until a shutdown signal arrives, then
//! stops any running transcoder so it is not orphaned by a clean exit.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use livegate_api::AppState;
use livegate_core::stream::StreamController;
use livegate_core::Config;

/// Serve the HTTP API until shutdown, then tear down the stream.
pub async fn run(config: &Config, state: AppState, controller: Arc<StreamController>) -> Result<()> {
    let router = livegate_api::create_router(state);

    let http_address = config.http_address();
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP address {http_address}: {e}"))?;

    info!("HTTP server listening on {}", http_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shut down gracefully");

    // A controller restart cannot reattach to a live transcoder, so never
    // leave one behind on a clean exit.
    controller.shutdown().await;
    info!("Livegate server shut down complete");

    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
