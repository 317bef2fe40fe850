//! Encounter lifecycle routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{CombatantData, EncounterData};
use crate::application::services::{EncounterError, TurnError};
use crate::domain::value_objects::{EncounterId, PartyId};
use crate::infrastructure::state::AppState;

fn encounter_status(e: &EncounterError) -> StatusCode {
    match e {
        EncounterError::NotFound(_) => StatusCode::NOT_FOUND,
        EncounterError::Validation(_) => StatusCode::BAD_REQUEST,
        EncounterError::Repository(err) => {
            tracing::error!("Encounter storage error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn turn_status(e: &TurnError) -> StatusCode {
    match e {
        TurnError::EncounterNotFound(_) | TurnError::CombatantNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        TurnError::InvalidState { .. } => StatusCode::CONFLICT,
        TurnError::Repository(err) => {
            tracing::error!("Turn storage error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T, StatusCode> {
    raw.parse().map_err(|_| StatusCode::BAD_REQUEST)
}

#[derive(serde::Deserialize)]
pub struct CreateEncounterRequest {
    pub party_id: String,
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_encounter(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateEncounterRequest>,
) -> Result<Json<EncounterData>, StatusCode> {
    let party_id: PartyId = parse_id(&body.party_id)?;
    let encounter = state
        .encounter_service
        .create(party_id, &body.name, body.description)
        .await
        .map_err(|e| encounter_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn get_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .encounter_service
        .get(id)
        .await
        .map_err(|e| encounter_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn list_party_encounters(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
) -> Result<Json<Vec<EncounterData>>, StatusCode> {
    let party_id: PartyId = parse_id(&party_id)?;
    let encounters = state
        .encounter_service
        .list_by_party(party_id)
        .await
        .map_err(|e| encounter_status(&e))?;
    Ok(Json(encounters.iter().map(EncounterData::from).collect()))
}

#[derive(serde::Deserialize)]
pub struct UpdateEncounterRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateEncounterRequest>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .encounter_service
        .update_details(id, body.name, body.description)
        .await
        .map_err(|e| encounter_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn start_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .turn_service
        .start(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn advance_round(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .turn_service
        .advance_round(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn end_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .turn_service
        .end(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn duplicate_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EncounterData>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let encounter = state
        .turn_service
        .duplicate(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(EncounterData::from(&encounter)))
}

pub async fn next_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<CombatantData>>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let combatant = state
        .turn_service
        .next_actor(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(
        combatant
            .as_ref()
            .map(|c| CombatantData::from_combatant(c, None)),
    ))
}
