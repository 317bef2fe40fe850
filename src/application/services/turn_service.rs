//! Turn service - the encounter state machine
//!
//! Planning -> Active -> Completed, with Completed terminal. Round
//! advances commit atomically: flag reset, round bump and the fresh
//! initiative deal land in one store transaction, followed by exactly one
//! `round_advanced` log event.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, CombatantRepositoryPort, EncounterRepositoryPort,
};
use crate::application::services::initiative_service::deal_for_roster;
use crate::application::services::CombatLogService;
use crate::domain::entities::{next_actor, Combatant, Encounter, EncounterStatus};
use crate::domain::events::LogEventKind;
use crate::domain::value_objects::{CombatantId, EncounterId, GroupId};

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("encounter not found: {0}")]
    EncounterNotFound(EncounterId),
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),
    #[error("encounter is {actual}, expected {expected}")]
    InvalidState {
        expected: EncounterStatus,
        actual: EncounterStatus,
    },
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl TurnError {
    fn expected(expected: EncounterStatus, actual: EncounterStatus) -> Self {
        Self::InvalidState { expected, actual }
    }
}

pub struct TurnService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    combatants: Arc<dyn CombatantRepositoryPort>,
    log: Arc<CombatLogService>,
    notifier: Arc<dyn ChangeNotifierPort>,
}

impl TurnService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        combatants: Arc<dyn CombatantRepositoryPort>,
        log: Arc<CombatLogService>,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        Self {
            encounters,
            combatants,
            log,
            notifier,
        }
    }

    /// Planning -> Active. Sets round 1 and deals initiative to the whole
    /// roster. The round-advance is implicit; nothing is logged for it.
    pub async fn start(&self, encounter_id: EncounterId) -> Result<Encounter, TurnError> {
        let mut encounter = self.load(encounter_id).await?;
        if !encounter.start() {
            return Err(TurnError::expected(
                EncounterStatus::Planning,
                encounter.status,
            ));
        }

        let roster = self.combatants.list(encounter_id).await?;
        let dealt = deal_for_roster(&mut rand::thread_rng(), &roster);
        self.encounters.advance_round(&encounter, &dealt).await?;

        tracing::info!(
            encounter_id = %encounter_id,
            combatants = roster.len(),
            "Encounter started: {}",
            encounter.name
        );
        self.notifier.notify(encounter_id, ChangeTopic::Encounter);
        self.notifier.notify(encounter_id, ChangeTopic::Combatants);
        Ok(encounter)
    }

    /// Advance to the next round: every `has_acted` flag resets, the round
    /// counter climbs by exactly one, initiative is re-dealt, and one
    /// `round_advanced` event is appended.
    pub async fn advance_round(&self, encounter_id: EncounterId) -> Result<Encounter, TurnError> {
        let mut encounter = self.load(encounter_id).await?;
        if !encounter.advance_round() {
            return Err(TurnError::expected(EncounterStatus::Active, encounter.status));
        }

        let roster = self.combatants.list(encounter_id).await?;
        let dealt = deal_for_roster(&mut rand::thread_rng(), &roster);
        self.encounters.advance_round(&encounter, &dealt).await?;

        self.log
            .append(
                encounter_id,
                LogEventKind::RoundAdvanced {
                    round: encounter.current_round,
                },
            )
            .await
            .map_err(anyhow::Error::from)?;

        tracing::info!(
            encounter_id = %encounter_id,
            round = encounter.current_round,
            "Round advanced"
        );
        self.notifier.notify(encounter_id, ChangeTopic::Encounter);
        self.notifier.notify(encounter_id, ChangeTopic::Combatants);
        Ok(encounter)
    }

    /// Flip a combatant's card: it has taken its turn.
    pub async fn flip(&self, combatant_id: CombatantId) -> Result<Combatant, TurnError> {
        self.set_acted(combatant_id, true).await
    }

    /// Unflip a combatant's card (holding a reaction).
    pub async fn unflip(&self, combatant_id: CombatantId) -> Result<Combatant, TurnError> {
        self.set_acted(combatant_id, false).await
    }

    /// Active -> Completed. Combatants are frozen afterwards.
    pub async fn end(&self, encounter_id: EncounterId) -> Result<Encounter, TurnError> {
        let mut encounter = self.load(encounter_id).await?;
        if !encounter.end() {
            return Err(TurnError::expected(EncounterStatus::Active, encounter.status));
        }
        self.encounters.update(&encounter).await?;

        tracing::info!(encounter_id = %encounter_id, "Encounter completed: {}", encounter.name);
        self.notifier.notify(encounter_id, ChangeTopic::Encounter);
        Ok(encounter)
    }

    /// Copy an encounter into a fresh Planning one: full roster copied,
    /// HP/WP back to max, initiative and flags cleared. The original is
    /// left untouched (completed encounters are never reopened).
    pub async fn duplicate(&self, encounter_id: EncounterId) -> Result<Encounter, TurnError> {
        let encounter = self.load(encounter_id).await?;
        let copy = encounter.duplicated();

        let roster = self.combatants.list(encounter_id).await?;
        let mut group_map: HashMap<GroupId, GroupId> = HashMap::new();
        let copied: Vec<Combatant> = roster
            .iter()
            .map(|c| {
                let mut slot = c.clone();
                slot.id = CombatantId::new();
                slot.encounter_id = copy.id;
                slot.current_hp = slot.max_hp;
                slot.current_wp = slot.max_wp;
                slot.initiative = None;
                slot.has_acted = false;
                if let crate::domain::entities::CombatantKind::Monster { group_id, .. } =
                    &mut slot.kind
                {
                    *group_id = *group_map.entry(*group_id).or_insert_with(GroupId::new);
                }
                slot
            })
            .collect();

        self.encounters.create_with_combatants(&copy, &copied).await?;
        tracing::info!(
            source = %encounter_id,
            copy = %copy.id,
            combatants = copied.len(),
            "Duplicated encounter"
        );
        Ok(copy)
    }

    /// Client convenience: who should act next. Lowest card among
    /// conscious combatants that have not acted, ties by name.
    pub async fn next_actor(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<Combatant>, TurnError> {
        self.load(encounter_id).await?;
        let roster = self.combatants.list(encounter_id).await?;
        Ok(next_actor(&roster).cloned())
    }

    async fn set_acted(
        &self,
        combatant_id: CombatantId,
        acted: bool,
    ) -> Result<Combatant, TurnError> {
        let mut combatant = self
            .combatants
            .get(combatant_id)
            .await?
            .ok_or(TurnError::CombatantNotFound(combatant_id))?;
        let encounter = self.load(combatant.encounter_id).await?;
        if !encounter.is_active() {
            return Err(TurnError::expected(EncounterStatus::Active, encounter.status));
        }

        combatant.has_acted = acted;
        self.combatants.update(&combatant).await?;

        let kind = if acted {
            LogEventKind::TurnStart {
                combatant_id,
                name: combatant.display_name.clone(),
            }
        } else {
            LogEventKind::TurnEnd {
                combatant_id,
                name: combatant.display_name.clone(),
            }
        };
        self.log
            .append(combatant.encounter_id, kind)
            .await
            .map_err(anyhow::Error::from)?;

        self.notifier
            .notify(combatant.encounter_id, ChangeTopic::Combatants);
        Ok(combatant)
    }

    async fn load(&self, encounter_id: EncounterId) -> Result<Encounter, TurnError> {
        self.encounters
            .get(encounter_id)
            .await?
            .ok_or(TurnError::EncounterNotFound(encounter_id))
    }
}
