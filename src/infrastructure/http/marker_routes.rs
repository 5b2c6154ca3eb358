use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::application::services::MarkerSet;
use crate::domain::value_objects::ZoomLevel;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkerQuery {
    pub zoom: Option<u8>,
}

/// Markers for the current collection at the requested zoom
pub async fn get_markers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarkerQuery>,
) -> Result<Json<MarkerSet>, (StatusCode, String)> {
    let zoom = query.zoom.map(ZoomLevel::new).unwrap_or(state.config.view_zoom);
    let events = state
        .store
        .fetch_all()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(state.marker_service.render(&events, zoom)))
}
