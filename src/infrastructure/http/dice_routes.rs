//! Companion dice routes
//!
//! Attack descriptions carry dice notation the engine never evaluates
//! itself; this is the endpoint the client calls when the table wants the
//! server to roll them.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::domain::value_objects::{DiceNotation, DiceRoll};
use crate::infrastructure::state::AppState;

#[derive(serde::Deserialize)]
pub struct RollDiceRequest {
    pub notation: String,
}

pub async fn roll_dice(
    Json(body): Json<RollDiceRequest>,
) -> Result<Json<DiceRoll>, StatusCode> {
    let notation =
        DiceNotation::parse(&body.notation).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(notation.roll(&mut rand::thread_rng())))
}

#[derive(serde::Deserialize)]
pub struct QuickInitiativeRequest {
    /// Monster ferocity; omit for a player character's flat d10.
    pub ferocity: Option<i32>,
}

#[derive(serde::Serialize)]
pub struct QuickInitiativeResponse {
    pub value: i32,
}

pub async fn quick_initiative(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuickInitiativeRequest>,
) -> Json<QuickInitiativeResponse> {
    let value = state.initiative_service.quick_roll(body.ferocity);
    Json(QuickInitiativeResponse { value })
}
