//! In-memory persistence backend
//!
//! Mirrors the SQLite repositories for tests and throwaway dev runs. One
//! store owns every table so the cross-record atomic operations
//! (advance_round, duplicate, swap) stay atomic under its locks.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    CharacterProviderPort, CombatLogRepositoryPort, CombatantRepositoryPort,
    EncounterRepositoryPort, MonsterTemplateProviderPort, PartyProviderPort,
};
use crate::domain::entities::{CharacterSheet, Combatant, Encounter, MonsterTemplate};
use crate::domain::events::LogEvent;
use crate::domain::value_objects::{
    CharacterId, CombatantId, EncounterId, GroupId, MonsterTemplateId, PartyId,
};

/// Backing store for encounters, combatants and the combat log.
///
/// Combatants live in a Vec to preserve insertion order: the roster lists
/// in seating order and sibling writes walk that order.
#[derive(Default)]
pub struct InMemoryStore {
    encounters: RwLock<HashMap<EncounterId, Encounter>>,
    combatants: RwLock<Vec<Combatant>>,
    log: RwLock<Vec<LogEvent>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl EncounterRepositoryPort for InMemoryStore {
    async fn create(&self, encounter: &Encounter) -> Result<()> {
        self.encounters
            .write()
            .await
            .insert(encounter.id, encounter.clone());
        Ok(())
    }

    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>> {
        Ok(self.encounters.read().await.get(&id).cloned())
    }

    async fn list_by_party(&self, party_id: PartyId) -> Result<Vec<Encounter>> {
        let mut all: Vec<Encounter> = self
            .encounters
            .read()
            .await
            .values()
            .filter(|e| e.party_id == party_id)
            .cloned()
            .collect();
        all.sort_by_key(|e| e.created_at);
        Ok(all)
    }

    async fn update(&self, encounter: &Encounter) -> Result<()> {
        let mut encounters = self.encounters.write().await;
        if !encounters.contains_key(&encounter.id) {
            bail!("encounter not found: {}", encounter.id);
        }
        encounters.insert(encounter.id, encounter.clone());
        Ok(())
    }

    async fn create_with_combatants(
        &self,
        encounter: &Encounter,
        combatants: &[Combatant],
    ) -> Result<()> {
        let mut encounters = self.encounters.write().await;
        let mut roster = self.combatants.write().await;
        encounters.insert(encounter.id, encounter.clone());
        roster.extend(combatants.iter().cloned());
        Ok(())
    }

    async fn advance_round(
        &self,
        encounter: &Encounter,
        initiatives: &[(CombatantId, i32)],
    ) -> Result<()> {
        let mut encounters = self.encounters.write().await;
        let mut roster = self.combatants.write().await;
        if !encounters.contains_key(&encounter.id) {
            bail!("encounter not found: {}", encounter.id);
        }
        encounters.insert(encounter.id, encounter.clone());

        let cards: HashMap<CombatantId, i32> = initiatives.iter().copied().collect();
        for combatant in roster
            .iter_mut()
            .filter(|c| c.encounter_id == encounter.id)
        {
            combatant.has_acted = false;
            if let Some(card) = cards.get(&combatant.id) {
                combatant.initiative = Some(*card);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CombatantRepositoryPort for InMemoryStore {
    async fn create(&self, combatant: &Combatant) -> Result<()> {
        self.combatants.write().await.push(combatant.clone());
        Ok(())
    }

    async fn create_many(&self, combatants: &[Combatant]) -> Result<()> {
        self.combatants
            .write()
            .await
            .extend(combatants.iter().cloned());
        Ok(())
    }

    async fn get(&self, id: CombatantId) -> Result<Option<Combatant>> {
        Ok(self
            .combatants
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<Combatant>> {
        Ok(self
            .combatants
            .read()
            .await
            .iter()
            .filter(|c| c.encounter_id == encounter_id)
            .cloned()
            .collect())
    }

    async fn update(&self, combatant: &Combatant) -> Result<()> {
        let mut roster = self.combatants.write().await;
        match roster.iter_mut().find(|c| c.id == combatant.id) {
            Some(slot) => {
                *slot = combatant.clone();
                Ok(())
            }
            None => bail!("combatant not found: {}", combatant.id),
        }
    }

    async fn delete(&self, id: CombatantId) -> Result<()> {
        self.combatants.write().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_group(&self, encounter_id: EncounterId, group_id: GroupId) -> Result<u64> {
        let mut roster = self.combatants.write().await;
        let before = roster.len();
        roster.retain(|c| {
            !(c.encounter_id == encounter_id && c.group_id() == Some(group_id))
        });
        Ok((before - roster.len()) as u64)
    }

    async fn set_initiatives(&self, values: &[(CombatantId, i32)]) -> Result<()> {
        let mut roster = self.combatants.write().await;
        for (id, card) in values {
            match roster.iter_mut().find(|c| c.id == *id) {
                Some(c) => c.initiative = Some(*card),
                None => bail!("combatant not found: {}", id),
            }
        }
        Ok(())
    }

    async fn swap_initiative(&self, a: CombatantId, b: CombatantId) -> Result<()> {
        let mut roster = self.combatants.write().await;
        let first = roster
            .iter()
            .position(|c| c.id == a)
            .ok_or_else(|| anyhow::anyhow!("combatant not found: {}", a))?;
        let second = roster
            .iter()
            .position(|c| c.id == b)
            .ok_or_else(|| anyhow::anyhow!("combatant not found: {}", b))?;
        let card = roster[first].initiative;
        roster[first].initiative = roster[second].initiative;
        roster[second].initiative = card;
        Ok(())
    }
}

#[async_trait]
impl CombatLogRepositoryPort for InMemoryStore {
    async fn append(&self, event: &LogEvent) -> Result<()> {
        self.log.write().await.push(event.clone());
        Ok(())
    }

    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<LogEvent>> {
        Ok(self
            .log
            .read()
            .await
            .iter()
            .filter(|e| e.encounter_id == encounter_id)
            .cloned()
            .collect())
    }
}

/// In-memory read-only providers: character sheets, monster templates and
/// party membership.
#[derive(Default)]
pub struct InMemoryCompendium {
    characters: RwLock<HashMap<CharacterId, CharacterSheet>>,
    templates: RwLock<HashMap<MonsterTemplateId, MonsterTemplate>>,
    parties: RwLock<HashMap<PartyId, Vec<CharacterId>>>,
}

impl InMemoryCompendium {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn insert_character(&self, sheet: CharacterSheet) {
        self.characters.write().await.insert(sheet.id, sheet);
    }

    pub async fn insert_template(&self, template: MonsterTemplate) {
        self.templates.write().await.insert(template.id, template);
    }

    pub async fn set_party(&self, party_id: PartyId, members: Vec<CharacterId>) {
        self.parties.write().await.insert(party_id, members);
    }
}

#[async_trait]
impl CharacterProviderPort for InMemoryCompendium {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>> {
        Ok(self.characters.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl MonsterTemplateProviderPort for InMemoryCompendium {
    async fn get(&self, id: MonsterTemplateId) -> Result<Option<MonsterTemplate>> {
        Ok(self.templates.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl PartyProviderPort for InMemoryCompendium {
    async fn members(&self, party_id: PartyId) -> Result<Vec<CharacterId>> {
        Ok(self
            .parties
            .read()
            .await
            .get(&party_id)
            .cloned()
            .unwrap_or_default())
    }
}
