//! Combat log routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::LogEventData;
use crate::application::services::LogError;
use crate::domain::value_objects::EncounterId;
use crate::infrastructure::state::AppState;

pub async fn list_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LogEventData>>, StatusCode> {
    let id: EncounterId = id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let events = state.log_service.list(id).await.map_err(|e| {
        let LogError::Repository(err) = &e;
        tracing::error!("Combat log storage error: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(events.iter().map(LogEventData::from).collect()))
}
