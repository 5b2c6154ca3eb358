//! Emotion collection API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::application::dto::{AppendEventRequest, EmotionEventDto};
use crate::application::services::dtos_to_events;
use crate::infrastructure::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub emotion: EmotionEventDto,
}

/// List the whole collection
pub async fn list_emotions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmotionEventDto>>, (StatusCode, String)> {
    let events = state.store.fetch_all().await.map_err(|e| {
        tracing::error!("Failed to read emotions: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(events.iter().map(EmotionEventDto::from).collect()))
}

/// Append one report
pub async fn create_emotion(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AppendEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), (StatusCode, String)> {
    let Json(request) = body.map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;
    let event = request
        .into_event(Utc::now())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    state.store.append(&event).await.map_err(|e| {
        tracing::error!("Failed to append emotion {}: {}", event.id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    tracing::debug!("Appended emotion {}", event.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Emotion added".to_string(),
            emotion: EmotionEventDto::from(&event),
        }),
    ))
}

/// Replace the whole collection; nothing is written unless every element is valid
pub async fn replace_emotions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let Json(body) = body.map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;
    if !body.is_array() {
        return Err((StatusCode::BAD_REQUEST, "Body must be an array".to_string()));
    }

    let dtos: Vec<EmotionEventDto> =
        serde_json::from_value(body).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let events = dtos_to_events(dtos).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    state.store.replace_all(&events).await.map_err(|e| {
        tracing::error!("Failed to replace emotions: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(MessageResponse {
        message: format!("Saved {} emotions", events.len()),
    }))
}

/// Remove every report
pub async fn clear_emotions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state.store.clear().await.map_err(|e| {
        tracing::error!("Failed to clear emotions: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(MessageResponse {
        message: "Deleted all emotions".to_string(),
    }))
}
