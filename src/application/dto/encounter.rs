//! Wire shapes for encounter, roster and log payloads

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Combatant, CombatantKind, Encounter};
use crate::domain::events::{LogEvent, LogEventKind};

/// Encounter as sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterData {
    pub id: String,
    pub party_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub current_round: u32,
    pub active_combatant_id: Option<String>,
    pub created_at: i64,
}

impl From<&Encounter> for EncounterData {
    fn from(e: &Encounter) -> Self {
        Self {
            id: e.id.to_string(),
            party_id: e.party_id.to_string(),
            name: e.name.clone(),
            description: e.description.clone(),
            status: e.status.to_string(),
            current_round: e.current_round,
            active_combatant_id: e.active_combatant_id.map(|id| id.to_string()),
            created_at: e.created_at.timestamp(),
        }
    }
}

/// Combatant as sent to clients.
///
/// `template_name` is resolved best-effort: a monster slot whose template
/// is missing from the compendium still renders, just without details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantData {
    pub id: String,
    pub encounter_id: String,
    pub kind: String,
    pub character_ref: Option<String>,
    pub owner: Option<String>,
    pub template_ref: Option<String>,
    pub template_name: Option<String>,
    pub group_id: Option<String>,
    pub display_name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub max_wp: Option<i32>,
    pub current_wp: Option<i32>,
    pub initiative: Option<i32>,
    pub has_acted: bool,
}

impl CombatantData {
    pub fn from_combatant(c: &Combatant, template_name: Option<String>) -> Self {
        let (kind, character_ref, owner, template_ref, group_id) = match &c.kind {
            CombatantKind::Player {
                character_ref,
                owner,
            } => (
                "player",
                Some(character_ref.to_string()),
                Some(owner.clone()),
                None,
                None,
            ),
            CombatantKind::Monster {
                template_ref,
                group_id,
            } => (
                "monster",
                None,
                None,
                Some(template_ref.to_string()),
                Some(group_id.to_string()),
            ),
        };
        Self {
            id: c.id.to_string(),
            encounter_id: c.encounter_id.to_string(),
            kind: kind.to_string(),
            character_ref,
            owner,
            template_ref,
            template_name,
            group_id,
            display_name: c.display_name.clone(),
            max_hp: c.max_hp,
            current_hp: c.current_hp,
            max_wp: c.max_wp,
            current_wp: c.current_wp,
            initiative: c.initiative,
            has_acted: c.has_acted,
        }
    }
}

/// One combat log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEventData {
    pub id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub kind: LogEventKind,
}

impl From<&LogEvent> for LogEventData {
    fn from(e: &LogEvent) -> Self {
        Self {
            id: e.id.to_string(),
            timestamp: e.timestamp.to_rfc3339(),
            kind: e.kind.clone(),
        }
    }
}
