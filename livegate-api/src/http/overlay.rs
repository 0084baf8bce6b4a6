//! Overlay CRUD endpoints
//!
//! Thin persistence glue over the overlay document store. Validation is
//! carried by the typed request shapes: an unknown overlay type fails JSON
//! extraction with a 400 before reaching the store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::http::{AppResult, AppState};
use livegate_core::overlay::{NewOverlay, Overlay, OverlayPatch};

#[derive(Debug, Serialize)]
pub struct DeleteOverlayResponse {
    pub message: String,
}

/// POST /api/overlays
pub async fn create_overlay(
    State(state): State<AppState>,
    Json(new): Json<NewOverlay>,
) -> AppResult<(StatusCode, Json<Overlay>)> {
    let overlay = state.overlays.create(new).await?;
    Ok((StatusCode::CREATED, Json(overlay)))
}

/// GET /api/overlays
pub async fn list_overlays(State(state): State<AppState>) -> AppResult<Json<Vec<Overlay>>> {
    Ok(Json(state.overlays.list().await?))
}

/// GET /api/overlays/{id}
pub async fn get_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Overlay>> {
    Ok(Json(state.overlays.get(&id).await?))
}

/// PUT /api/overlays/{id}
pub async fn update_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OverlayPatch>,
) -> AppResult<Json<Overlay>> {
    Ok(Json(state.overlays.update(&id, patch).await?))
}

/// DELETE /api/overlays/{id}
pub async fn delete_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteOverlayResponse>> {
    state.overlays.delete(&id).await?;
    Ok(Json(DeleteOverlayResponse {
        message: "Overlay deleted successfully".to_string(),
    }))
}
