//! Stream lifecycle endpoints
//!
//! Start, stop, and status for the single stream slot. Start blocks until
//! the transcoder output is confirmed playable or the readiness deadline
//! passes; the serialization of concurrent starts/stops lives in the
//! controller, not here.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::{AppResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartStreamRequest {
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartStreamResponse {
    pub hls_url: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopStreamResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatusResponse {
    pub is_active: bool,
    pub hls_url: Option<String>,
}

/// POST /stream/start
pub async fn start_stream(
    State(state): State<AppState>,
    Json(req): Json<StartStreamRequest>,
) -> AppResult<Json<StartStreamResponse>> {
    let hls_url = state.controller.start(&req.source_url).await?;
    info!(hls_url = %hls_url, "stream started");
    Ok(Json(StartStreamResponse {
        hls_url,
        message: "Stream started successfully".to_string(),
    }))
}

/// POST /stream/stop — idempotent, succeeds even when already idle
pub async fn stop_stream(State(state): State<AppState>) -> AppResult<Json<StopStreamResponse>> {
    state.controller.stop().await?;
    Ok(Json(StopStreamResponse {
        message: "Stream stopped successfully".to_string(),
    }))
}

/// GET /stream/status — non-blocking snapshot
pub async fn stream_status(State(state): State<AppState>) -> Json<StreamStatusResponse> {
    let status = state.controller.status();
    Json(StreamStatusResponse {
        is_active: status.is_active,
        hls_url: status.hls_url,
    })
}
