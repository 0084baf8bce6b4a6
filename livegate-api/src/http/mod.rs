// Module: http
// HTTP/JSON boundary over the stream lifecycle controller and overlay store

pub mod error;
pub mod health;
pub mod overlay;
pub mod static_files;
pub mod stream;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use livegate_core::overlay::OverlayStore;
use livegate_core::stream::{ArtifactStore, StreamController};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<StreamController>,
    pub overlays: Arc<dyn OverlayStore>,
    pub artifacts: ArtifactStore,
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check endpoint (for monitoring probes)
        .merge(health::create_health_router())
        // Stream lifecycle
        .route("/stream/start", post(stream::start_stream))
        .route("/stream/stop", post(stream::stop_stream))
        .route("/stream/status", get(stream::stream_status))
        // HLS artifacts
        .route("/static/{filename}", get(static_files::serve_artifact))
        // Overlay documents
        .route(
            "/api/overlays",
            post(overlay::create_overlay).get(overlay::list_overlays),
        )
        .route(
            "/api/overlays/{id}",
            get(overlay::get_overlay)
                .put(overlay::update_overlay)
                .delete(overlay::delete_overlay),
        );

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    router.with_state(state)
}
