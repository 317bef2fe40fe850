//! HTTP route handlers

pub mod combatant_routes;
pub mod dice_routes;
pub mod encounter_routes;
pub mod log_routes;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::infrastructure::state::AppState;

/// The REST surface. WebSocket and health endpoints are mounted by main.
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Encounter lifecycle
        .route("/api/encounters", post(encounter_routes::create_encounter))
        .route(
            "/api/encounters/{id}",
            get(encounter_routes::get_encounter).put(encounter_routes::update_encounter),
        )
        .route(
            "/api/parties/{id}/encounters",
            get(encounter_routes::list_party_encounters),
        )
        .route(
            "/api/encounters/{id}/start",
            post(encounter_routes::start_encounter),
        )
        .route(
            "/api/encounters/{id}/advance-round",
            post(encounter_routes::advance_round),
        )
        .route(
            "/api/encounters/{id}/end",
            post(encounter_routes::end_encounter),
        )
        .route(
            "/api/encounters/{id}/duplicate",
            post(encounter_routes::duplicate_encounter),
        )
        .route(
            "/api/encounters/{id}/next-actor",
            get(encounter_routes::next_actor),
        )
        // Roster
        .route(
            "/api/encounters/{id}/combatants",
            get(combatant_routes::list_combatants),
        )
        .route(
            "/api/encounters/{id}/combatants/characters",
            post(combatant_routes::add_character),
        )
        .route(
            "/api/encounters/{id}/combatants/monsters",
            post(combatant_routes::add_monster),
        )
        .route(
            "/api/combatants/{id}",
            delete(combatant_routes::remove_combatant),
        )
        .route(
            "/api/combatants/{id}/group",
            delete(combatant_routes::remove_group),
        )
        // Initiative
        .route(
            "/api/encounters/{id}/initiative",
            post(combatant_routes::roll_initiative),
        )
        .route(
            "/api/combatants/{a}/swap/{b}",
            post(combatant_routes::swap_initiative),
        )
        // Turns and combat
        .route(
            "/api/combatants/{id}/flip",
            post(combatant_routes::flip_combatant),
        )
        .route(
            "/api/combatants/{id}/unflip",
            post(combatant_routes::unflip_combatant),
        )
        .route(
            "/api/combatants/{id}/damage",
            post(combatant_routes::apply_damage),
        )
        .route(
            "/api/combatants/{id}/willpower",
            post(combatant_routes::apply_willpower),
        )
        .route("/api/combatants/{id}/hp", put(combatant_routes::set_hp))
        .route(
            "/api/combatants/{id}/attack-roll",
            post(combatant_routes::roll_attack),
        )
        .route(
            "/api/combatants/{id}/effect-roll",
            post(combatant_routes::roll_effect),
        )
        // Combat log
        .route("/api/encounters/{id}/log", get(log_routes::list_log))
        // Dice utility
        .route("/api/dice/roll", post(dice_routes::roll_dice))
        .route(
            "/api/dice/quick-initiative",
            post(dice_routes::quick_initiative),
        )
}
