//! Roster, initiative and combat-action routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{AttackRollData, CombatantData, DamageData};
use crate::application::services::{AttackError, InitiativeError, RosterError, TurnError};
use crate::domain::entities::Combatant;
use crate::domain::value_objects::{CharacterId, CombatantId, EncounterId, MonsterTemplateId};
use crate::infrastructure::state::AppState;

fn roster_status(e: &RosterError) -> StatusCode {
    match e {
        RosterError::EncounterNotFound(_)
        | RosterError::CharacterNotFound(_)
        | RosterError::TemplateNotFound(_)
        | RosterError::CombatantNotFound(_) => StatusCode::NOT_FOUND,
        RosterError::NotInParty(_) => StatusCode::FORBIDDEN,
        RosterError::AlreadySeated(_) | RosterError::EncounterCompleted(_) => StatusCode::CONFLICT,
        RosterError::Validation(_) => StatusCode::BAD_REQUEST,
        RosterError::Repository(err) => {
            tracing::error!("Roster storage error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn initiative_status(e: &InitiativeError) -> StatusCode {
    match e {
        InitiativeError::EncounterNotFound(_) | InitiativeError::CombatantNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        InitiativeError::EncounterCompleted(_) => StatusCode::CONFLICT,
        InitiativeError::Validation(_) => StatusCode::BAD_REQUEST,
        InitiativeError::Repository(err) => {
            tracing::error!("Initiative storage error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn attack_status(e: &AttackError) -> StatusCode {
    match e {
        AttackError::CombatantNotFound(_)
        | AttackError::EncounterNotFound(_)
        | AttackError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
        AttackError::EncounterCompleted(_) => StatusCode::CONFLICT,
        AttackError::Validation(_) => StatusCode::BAD_REQUEST,
        AttackError::Repository(err) => {
            tracing::error!("Attack storage error: {}", err);
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

/// Best-effort template name for a monster slot; lookup misses and store
/// errors both leave it blank rather than fail the roster response.
async fn template_name(state: &AppState, combatant: &Combatant) -> Option<String> {
    let template_ref = combatant.template_ref()?;
    match state.templates.get(template_ref).await {
        Ok(template) => template.map(|t| t.name),
        Err(e) => {
            tracing::warn!(
                template_ref = %template_ref,
                "Template lookup failed: {}",
                e
            );
            None
        }
    }
}

async fn to_data(state: &AppState, combatant: &Combatant) -> CombatantData {
    let name = template_name(state, combatant).await;
    CombatantData::from_combatant(combatant, name)
}

pub async fn list_combatants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CombatantData>>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let roster = state
        .roster_service
        .list(id)
        .await
        .map_err(|e| roster_status(&e))?;
    let mut out = Vec::with_capacity(roster.len());
    for combatant in &roster {
        out.push(to_data(&state, combatant).await);
    }
    Ok(Json(out))
}

#[derive(serde::Deserialize)]
pub struct AddCharacterRequest {
    pub character_id: String,
    pub initiative: Option<i32>,
}

pub async fn add_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AddCharacterRequest>,
) -> Result<(StatusCode, Json<CombatantData>), StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let character_id: CharacterId = parse_id(&body.character_id)?;
    let combatant = state
        .roster_service
        .add_character(id, character_id, body.initiative)
        .await
        .map_err(|e| roster_status(&e))?;
    Ok((
        StatusCode::CREATED,
        Json(CombatantData::from_combatant(&combatant, None)),
    ))
}

#[derive(serde::Deserialize)]
pub struct AddMonsterRequest {
    pub template_id: String,
    pub name: Option<String>,
    pub count: Option<u32>,
    pub initiative: Option<i32>,
}

pub async fn add_monster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AddMonsterRequest>,
) -> Result<(StatusCode, Json<Vec<CombatantData>>), StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let template_id: MonsterTemplateId = parse_id(&body.template_id)?;
    let group = state
        .roster_service
        .add_monster(id, template_id, body.name, body.count, body.initiative)
        .await
        .map_err(|e| roster_status(&e))?;
    let mut out = Vec::with_capacity(group.len());
    for combatant in &group {
        out.push(to_data(&state, combatant).await);
    }
    Ok((StatusCode::CREATED, Json(out)))
}

pub async fn remove_combatant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    state
        .roster_service
        .remove(id)
        .await
        .map_err(|e| roster_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Serialize)]
pub struct RemovedGroupResponse {
    pub removed: u64,
}

pub async fn remove_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RemovedGroupResponse>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let removed = state
        .roster_service
        .remove_group(id)
        .await
        .map_err(|e| roster_status(&e))?;
    Ok(Json(RemovedGroupResponse { removed }))
}

#[derive(serde::Deserialize)]
pub struct PinnedCard {
    pub combatant_id: String,
    pub card: i32,
}

#[derive(serde::Deserialize)]
pub struct RollInitiativeRequest {
    pub combatant_ids: Vec<String>,
    #[serde(default)]
    pub pinned: Vec<PinnedCard>,
}

pub async fn roll_initiative(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RollInitiativeRequest>,
) -> Result<Json<Vec<CombatantData>>, StatusCode> {
    let id: EncounterId = parse_id(&id)?;
    let combatant_ids: Vec<CombatantId> = body
        .combatant_ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<_, _>>()?;
    let pinned: Vec<(CombatantId, i32)> = body
        .pinned
        .iter()
        .map(|p| parse_id(&p.combatant_id).map(|id| (id, p.card)))
        .collect::<Result<_, _>>()?;
    let dealt = state
        .initiative_service
        .roll_initiative(id, &combatant_ids, &pinned)
        .await
        .map_err(|e| initiative_status(&e))?;
    let mut out = Vec::with_capacity(dealt.len());
    for combatant in &dealt {
        out.push(to_data(&state, combatant).await);
    }
    Ok(Json(out))
}

pub async fn swap_initiative(
    State(state): State<Arc<AppState>>,
    Path((a, b)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let a: CombatantId = parse_id(&a)?;
    let b: CombatantId = parse_id(&b)?;
    state
        .initiative_service
        .swap_initiative(a, b)
        .await
        .map_err(|e| initiative_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn flip_combatant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CombatantData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let combatant = state
        .turn_service
        .flip(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(to_data(&state, &combatant).await))
}

pub async fn unflip_combatant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CombatantData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let combatant = state
        .turn_service
        .unflip(id)
        .await
        .map_err(|e| turn_status(&e))?;
    Ok(Json(to_data(&state, &combatant).await))
}

#[derive(serde::Deserialize)]
pub struct DamageRequest {
    pub amount: i32,
    pub attacker: Option<String>,
}

pub async fn apply_damage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<DamageRequest>,
) -> Result<Json<DamageData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let outcome = state
        .attack_service
        .apply_damage(id, body.amount, body.attacker)
        .await
        .map_err(|e| attack_status(&e))?;
    let name = template_name(&state, &outcome.combatant).await;
    Ok(Json(DamageData::from_outcome(&outcome, name)))
}

#[derive(serde::Deserialize)]
pub struct WillpowerRequest {
    pub amount: i32,
}

pub async fn apply_willpower(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<WillpowerRequest>,
) -> Result<Json<DamageData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let outcome = state
        .attack_service
        .apply_willpower(id, body.amount)
        .await
        .map_err(|e| attack_status(&e))?;
    let name = template_name(&state, &outcome.combatant).await;
    Ok(Json(DamageData::from_outcome(&outcome, name)))
}

#[derive(serde::Deserialize)]
pub struct SetHpRequest {
    pub hp: i32,
}

pub async fn set_hp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetHpRequest>,
) -> Result<Json<DamageData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let outcome = state
        .attack_service
        .set_hp(id, body.hp)
        .await
        .map_err(|e| attack_status(&e))?;
    let name = template_name(&state, &outcome.combatant).await;
    Ok(Json(DamageData::from_outcome(&outcome, name)))
}

pub async fn roll_attack(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AttackRollData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let outcome = state
        .attack_service
        .roll_attack(id)
        .await
        .map_err(|e| attack_status(&e))?;
    Ok(Json(AttackRollData::from(&outcome)))
}

#[derive(serde::Deserialize)]
pub struct RollEffectRequest {
    pub attack_name: String,
}

pub async fn roll_effect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RollEffectRequest>,
) -> Result<Json<AttackRollData>, StatusCode> {
    let id: CombatantId = parse_id(&id)?;
    let outcome = state
        .attack_service
        .roll_effect(id, &body.attack_name)
        .await
        .map_err(|e| attack_status(&e))?;
    Ok(Json(AttackRollData::from(&outcome)))
}
