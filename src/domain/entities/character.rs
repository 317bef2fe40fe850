//! Character sheets - player data consumed read-only by the engine
//!
//! Sheet editing lives in its own collaborator; the engine only reads the
//! fields it needs to seat a character at an encounter.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CharacterId;

/// The slice of a player character's sheet the engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub name: String,
    pub max_hp: i32,
    #[serde(default)]
    pub max_wp: Option<i32>,
    /// User id of the player who owns this character.
    pub owner: String,
}
