//! Roster service - who is seated at an encounter
//!
//! Seats player characters (one slot each, idempotent per character) and
//! monster instance groups (ferocity x count slots sharing one group id).

use std::sync::Arc;

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, CharacterProviderPort, CombatantRepositoryPort,
    EncounterRepositoryPort, MonsterTemplateProviderPort, PartyProviderPort,
};
use crate::domain::entities::{sort_turn_order, Combatant, Encounter, EncounterStatus};
use crate::domain::value_objects::{
    CharacterId, CombatantId, EncounterId, GroupId, MonsterTemplateId,
};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("encounter not found: {0}")]
    EncounterNotFound(EncounterId),
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("monster template not found: {0}")]
    TemplateNotFound(MonsterTemplateId),
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),
    #[error("character {0} is not a member of this encounter's party")]
    NotInParty(CharacterId),
    #[error("character {0} is already seated in this encounter")]
    AlreadySeated(CharacterId),
    #[error("encounter {0} is completed; its roster can no longer change")]
    EncounterCompleted(EncounterId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub struct RosterService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    combatants: Arc<dyn CombatantRepositoryPort>,
    characters: Arc<dyn CharacterProviderPort>,
    templates: Arc<dyn MonsterTemplateProviderPort>,
    parties: Arc<dyn PartyProviderPort>,
    notifier: Arc<dyn ChangeNotifierPort>,
}

impl RosterService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        combatants: Arc<dyn CombatantRepositoryPort>,
        characters: Arc<dyn CharacterProviderPort>,
        templates: Arc<dyn MonsterTemplateProviderPort>,
        parties: Arc<dyn PartyProviderPort>,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        Self {
            encounters,
            combatants,
            characters,
            templates,
            parties,
            notifier,
        }
    }

    /// Seat a party member's character. A character already present in the
    /// encounter is rejected rather than seated twice.
    pub async fn add_character(
        &self,
        encounter_id: EncounterId,
        character_ref: CharacterId,
        initiative: Option<i32>,
    ) -> Result<Combatant, RosterError> {
        let encounter = self.mutable_encounter(encounter_id).await?;

        let sheet = self
            .characters
            .get(character_ref)
            .await?
            .ok_or(RosterError::CharacterNotFound(character_ref))?;
        if sheet.name.trim().is_empty() {
            return Err(RosterError::Validation(
                "character has an empty display name".to_string(),
            ));
        }
        if sheet.max_hp < 1 {
            return Err(RosterError::Validation(format!(
                "character max_hp must be positive, got {}",
                sheet.max_hp
            )));
        }

        let members = self.parties.members(encounter.party_id).await?;
        if !members.contains(&character_ref) {
            return Err(RosterError::NotInParty(character_ref));
        }

        let roster = self.combatants.list(encounter_id).await?;
        if roster
            .iter()
            .any(|c| c.character_ref() == Some(character_ref))
        {
            return Err(RosterError::AlreadySeated(character_ref));
        }

        let combatant = Combatant::player(encounter_id, &sheet).with_initiative(initiative);
        self.combatants.create(&combatant).await?;

        tracing::info!(
            encounter_id = %encounter_id,
            combatant_id = %combatant.id,
            "Seated character: {}",
            combatant.display_name
        );
        self.notifier.notify(encounter_id, ChangeTopic::Combatants);
        Ok(combatant)
    }

    /// Seat a monster. `count` copies x the template's ferocity turn slots
    /// are created, all sharing one fresh group id. Slot names get a
    /// 1-based " (Act N)" suffix when the group has more than one slot.
    pub async fn add_monster(
        &self,
        encounter_id: EncounterId,
        template_ref: MonsterTemplateId,
        custom_name: Option<String>,
        count: Option<u32>,
        initiative: Option<i32>,
    ) -> Result<Vec<Combatant>, RosterError> {
        self.mutable_encounter(encounter_id).await?;

        let template = self
            .templates
            .get(template_ref)
            .await?
            .ok_or(RosterError::TemplateNotFound(template_ref))?;

        let count = count.unwrap_or(1);
        if count == 0 {
            return Err(RosterError::Validation(
                "monster count must be at least 1".to_string(),
            ));
        }
        let base_name = custom_name.unwrap_or_else(|| template.name.clone());
        let base_name = base_name.trim();
        if base_name.is_empty() {
            return Err(RosterError::Validation(
                "monster display name must not be empty".to_string(),
            ));
        }

        let slots = count as i64 * template.stats.ferocity() as i64;
        let group_id = GroupId::new();
        let group: Vec<Combatant> = (1..=slots)
            .map(|n| {
                let name = if slots == 1 {
                    base_name.to_string()
                } else {
                    format!("{} (Act {})", base_name, n)
                };
                Combatant::monster_slot(
                    encounter_id,
                    template_ref,
                    group_id,
                    name,
                    template.stats.hp,
                    template.stats.wp,
                )
                .with_initiative(initiative)
            })
            .collect();

        self.combatants.create_many(&group).await?;

        tracing::info!(
            encounter_id = %encounter_id,
            group_id = %group_id,
            slots = group.len(),
            "Seated monster group: {}",
            base_name
        );
        self.notifier.notify(encounter_id, ChangeTopic::Combatants);
        Ok(group)
    }

    /// Remove one combatant.
    pub async fn remove(&self, combatant_id: CombatantId) -> Result<(), RosterError> {
        let combatant = self
            .combatants
            .get(combatant_id)
            .await?
            .ok_or(RosterError::CombatantNotFound(combatant_id))?;
        self.mutable_encounter(combatant.encounter_id).await?;

        self.combatants.delete(combatant_id).await?;
        tracing::info!(
            encounter_id = %combatant.encounter_id,
            combatant_id = %combatant_id,
            "Removed combatant: {}",
            combatant.display_name
        );
        self.notifier
            .notify(combatant.encounter_id, ChangeTopic::Combatants);
        Ok(())
    }

    /// Remove the target and, for monster slots, every sibling sharing its
    /// group id. Returns how many combatants were removed.
    pub async fn remove_group(&self, combatant_id: CombatantId) -> Result<u64, RosterError> {
        let combatant = self
            .combatants
            .get(combatant_id)
            .await?
            .ok_or(RosterError::CombatantNotFound(combatant_id))?;
        self.mutable_encounter(combatant.encounter_id).await?;

        let removed = match combatant.group_id() {
            Some(group_id) => {
                self.combatants
                    .delete_group(combatant.encounter_id, group_id)
                    .await?
            }
            None => {
                self.combatants.delete(combatant_id).await?;
                1
            }
        };

        tracing::info!(
            encounter_id = %combatant.encounter_id,
            removed,
            "Removed combatant group of: {}",
            combatant.display_name
        );
        self.notifier
            .notify(combatant.encounter_id, ChangeTopic::Combatants);
        Ok(removed)
    }

    /// The encounter's roster in turn order (undealt combatants last).
    pub async fn list(&self, encounter_id: EncounterId) -> Result<Vec<Combatant>, RosterError> {
        self.encounters
            .get(encounter_id)
            .await?
            .ok_or(RosterError::EncounterNotFound(encounter_id))?;
        let mut roster = self.combatants.list(encounter_id).await?;
        sort_turn_order(&mut roster);
        Ok(roster)
    }

    /// Load an encounter whose roster may still be mutated.
    async fn mutable_encounter(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Encounter, RosterError> {
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(RosterError::EncounterNotFound(encounter_id))?;
        if encounter.status == EncounterStatus::Completed {
            return Err(RosterError::EncounterCompleted(encounter_id));
        }
        Ok(encounter)
    }
}
