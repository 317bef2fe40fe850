//! Initiative service - dealing and rearranging initiative cards

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, CombatantRepositoryPort, EncounterRepositoryPort,
};
use crate::domain::entities::{Combatant, EncounterStatus};
use crate::domain::value_objects::initiative::{self, CARD_MAX, CARD_MIN};
use crate::domain::value_objects::{CombatantId, EncounterId, InitiativeSlot};

#[derive(Debug, thiserror::Error)]
pub enum InitiativeError {
    #[error("encounter not found: {0}")]
    EncounterNotFound(EncounterId),
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),
    #[error("encounter {0} is completed; initiative can no longer change")]
    EncounterCompleted(EncounterId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub struct InitiativeService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    combatants: Arc<dyn CombatantRepositoryPort>,
    notifier: Arc<dyn ChangeNotifierPort>,
}

impl InitiativeService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        combatants: Arc<dyn CombatantRepositoryPort>,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        Self {
            encounters,
            combatants,
            notifier,
        }
    }

    /// Deal cards to exactly the given combatants. `pinned` entries keep
    /// their stated card (a character ability holding last round's card);
    /// everyone else draws from the shuffled remainder of the deck.
    ///
    /// Returns the updated combatants, in the order the ids were given.
    pub async fn roll_initiative(
        &self,
        encounter_id: EncounterId,
        combatant_ids: &[CombatantId],
        pinned: &[(CombatantId, i32)],
    ) -> Result<Vec<Combatant>, InitiativeError> {
        self.mutable_encounter(encounter_id).await?;
        if combatant_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roster = self.combatants.list(encounter_id).await?;
        let by_id: HashMap<CombatantId, &Combatant> =
            roster.iter().map(|c| (c.id, c)).collect();
        for id in combatant_ids {
            if !by_id.contains_key(id) {
                return Err(InitiativeError::CombatantNotFound(*id));
            }
        }

        let pins = validate_pins(combatant_ids, pinned)?;
        let slots: Vec<InitiativeSlot> = combatant_ids
            .iter()
            .map(|id| InitiativeSlot {
                combatant_id: *id,
                pinned: pins.get(id).copied(),
            })
            .collect();

        let dealt = initiative::deal(&mut rand::thread_rng(), &slots);
        self.combatants.set_initiatives(&dealt).await?;

        tracing::debug!(
            encounter_id = %encounter_id,
            dealt = dealt.len(),
            pinned = pins.len(),
            "Dealt initiative"
        );
        self.notifier.notify(encounter_id, ChangeTopic::Combatants);

        let cards: HashMap<CombatantId, i32> = dealt.into_iter().collect();
        Ok(combatant_ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|c| (*c).clone()))
            .map(|mut c| {
                c.initiative = cards.get(&c.id).copied();
                c
            })
            .collect())
    }

    /// Exchange the cards of two combatants. The swap is a single store
    /// transaction: both writes land or neither does.
    pub async fn swap_initiative(
        &self,
        a: CombatantId,
        b: CombatantId,
    ) -> Result<(), InitiativeError> {
        if a == b {
            return Err(InitiativeError::Validation(
                "cannot swap a combatant with itself".to_string(),
            ));
        }
        let first = self
            .combatants
            .get(a)
            .await?
            .ok_or(InitiativeError::CombatantNotFound(a))?;
        let second = self
            .combatants
            .get(b)
            .await?
            .ok_or(InitiativeError::CombatantNotFound(b))?;
        if first.encounter_id != second.encounter_id {
            return Err(InitiativeError::Validation(
                "combatants belong to different encounters".to_string(),
            ));
        }
        self.mutable_encounter(first.encounter_id).await?;

        self.combatants.swap_initiative(a, b).await?;
        tracing::debug!(
            encounter_id = %first.encounter_id,
            "Swapped initiative: {} <-> {}",
            first.display_name,
            second.display_name
        );
        self.notifier
            .notify(first.encounter_id, ChangeTopic::Combatants);
        Ok(())
    }

    /// The quick-roll variant retained from the earlier design: uniform
    /// d10 for characters, best of clipped-ferocity d10s for monsters. Not
    /// part of the round flow; exposed for table styles that prefer it.
    pub fn quick_roll(&self, ferocity: Option<i32>) -> i32 {
        let mut rng = rand::thread_rng();
        match ferocity {
            Some(ferocity) => initiative::quick_roll_monster(&mut rng, ferocity),
            None => initiative::quick_roll_character(&mut rng),
        }
    }

    async fn mutable_encounter(&self, encounter_id: EncounterId) -> Result<(), InitiativeError> {
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(InitiativeError::EncounterNotFound(encounter_id))?;
        if encounter.status == EncounterStatus::Completed {
            return Err(InitiativeError::EncounterCompleted(encounter_id));
        }
        Ok(())
    }
}

fn validate_pins(
    combatant_ids: &[CombatantId],
    pinned: &[(CombatantId, i32)],
) -> Result<HashMap<CombatantId, i32>, InitiativeError> {
    let mut pins = HashMap::new();
    for (id, card) in pinned {
        if !combatant_ids.contains(id) {
            return Err(InitiativeError::Validation(format!(
                "pinned combatant {} is not part of this deal",
                id
            )));
        }
        if !(CARD_MIN..=CARD_MAX).contains(card) {
            return Err(InitiativeError::Validation(format!(
                "pinned card {} is outside {}..={}",
                card, CARD_MIN, CARD_MAX
            )));
        }
        if pins.insert(*id, *card).is_some() {
            return Err(InitiativeError::Validation(format!(
                "combatant {} pinned more than once",
                id
            )));
        }
    }
    Ok(pins)
}

/// Deal a full-roster round of initiative. Shared by the turn service's
/// `start` and `advance_round`, which commit the result atomically with the
/// round bump.
pub(crate) fn deal_for_roster<R: Rng>(rng: &mut R, roster: &[Combatant]) -> Vec<(CombatantId, i32)> {
    let slots: Vec<InitiativeSlot> = roster
        .iter()
        .map(|c| InitiativeSlot::new(c.id))
        .collect();
    initiative::deal(rng, &slots)
}
