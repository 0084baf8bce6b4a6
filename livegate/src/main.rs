mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use livegate_api::AppState;
use livegate_core::overlay::JsonFileStore;
use livegate_core::stream::{ArtifactStore, StreamController};
use livegate_core::{logging, Config};

/// RTSP-to-HLS restream gateway with overlay metadata
#[derive(Debug, Parser)]
#[command(name = "livegate", version)]
struct Args {
    /// Path to a config file (YAML/TOML/JSON); environment variables with
    /// the LIVEGATE_ prefix take precedence
    #[arg(short, long, env = "LIVEGATE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let config = Config::load(args.config.as_deref())?;

    // 2. Validate configuration (fail fast on misconfigurations)
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    // 3. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Livegate server starting...");
    info!("HTTP address: {}", config.http_address());
    info!("HLS output dir: {}", config.stream.output_dir.display());

    // 4. Build the stream lifecycle controller and clear any artifacts a
    // previous run left behind. A transcoder orphaned by a crash of the
    // previous run cannot be reattached; its artifacts are removed here.
    let controller = Arc::new(StreamController::new(
        config.stream.clone(),
        config.server.public_base_url.clone(),
    ));
    controller.startup_cleanup().await?;

    // 5. Open the overlay document store
    let overlays = Arc::new(JsonFileStore::open(&config.overlay.store_path).await?);
    info!(
        "Overlay store: {}",
        config.overlay.store_path.display()
    );

    let state = AppState {
        controller: controller.clone(),
        overlays,
        artifacts: ArtifactStore::new(config.stream.output_dir.clone()),
    };

    // 6. Serve until shutdown, then tear down any running transcoder
    server::run(&config, state, controller).await
}
