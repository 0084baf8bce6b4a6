//! HLS artifact serving
//!
//! Serves the playlist and segment files byte-for-byte from the output
//! directory. Name resolution is delegated to the artifact store, which only
//! resolves plain names matching the stream naming convention.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::{AppError, AppResult, AppState};

fn content_type(name: &str) -> &'static str {
    if name.ends_with(".m3u8") {
        "application/vnd.apple.mpegurl"
    } else if name.ends_with(".ts") {
        "video/mp2t"
    } else {
        "application/octet-stream"
    }
}

/// GET /static/{filename}
pub async fn serve_artifact(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let path = state
        .artifacts
        .resolve(&filename)
        .await
        .ok_or_else(|| AppError::not_found(format!("No such file: {filename}")))?;

    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found(format!("No such file: {filename}")))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&filename))
        // Live window: players must re-fetch the playlist every few seconds
        .header(header::CACHE_CONTROL, "no-cache, no-store")
        .body(Body::from(data))
        .map_err(|e| AppError::internal_server_error(format!("Failed to build response: {e}")))?
        .into_response())
}
