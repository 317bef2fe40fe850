//! Provider ports - read-only collaborators the engine consumes
//!
//! Character sheets, monster templates and party membership are owned by
//! other parts of the product; the engine only reads them.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::{CharacterSheet, MonsterTemplate};
use crate::domain::value_objects::{CharacterId, MonsterTemplateId, PartyId};

/// Read-only access to player character sheets.
#[async_trait]
pub trait CharacterProviderPort: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>>;
}

/// Read-only access to the monster compendium.
#[async_trait]
pub trait MonsterTemplateProviderPort: Send + Sync {
    async fn get(&self, id: MonsterTemplateId) -> Result<Option<MonsterTemplate>>;
}

/// Read-only access to party membership (who may be seated as a character
/// combatant).
#[async_trait]
pub trait PartyProviderPort: Send + Sync {
    async fn members(&self, party_id: PartyId) -> Result<Vec<CharacterId>>;
}
