//! Liveness endpoints.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::AppState;

#[derive(Serialize)]
struct Banner {
    message: &'static str,
}

pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_banner))
        .route("/health", get(liveness))
}

/// Identifies the service to anyone poking the port by hand.
async fn service_banner() -> Json<Banner> {
    Json(Banner {
        message: "livegate stream control API",
    })
}

// Monitoring only looks at the status code
async fn liveness() -> &'static str {
    "OK"
}
