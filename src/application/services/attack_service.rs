//! Attack service - monster action rolls and damage application
//!
//! Damage to a monster slot propagates to every sibling in its group as an
//! ordered sequence of single-record writes. The sequence is deliberately
//! not a transaction: a write that fails midway leaves the group divergent,
//! which is reported as a partial sync and logged, never rolled back.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, CombatantRepositoryPort, EncounterRepositoryPort,
    MonsterTemplateProviderPort,
};
use crate::application::services::CombatLogService;
use crate::domain::entities::{AttackEntry, Combatant, EncounterStatus};
use crate::domain::events::LogEventKind;
use crate::domain::value_objects::{CombatantId, DiceNotation, EncounterId, MonsterTemplateId};

#[derive(Debug, thiserror::Error)]
pub enum AttackError {
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),
    #[error("encounter not found: {0}")]
    EncounterNotFound(EncounterId),
    #[error("monster template not found: {0}")]
    TemplateNotFound(MonsterTemplateId),
    #[error("encounter {0} is completed; combatants can no longer change")]
    EncounterCompleted(EncounterId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

/// A matched attack-table entry, with any embedded dice notation flagged
/// for the companion roll utility. The engine never evaluates the dice.
#[derive(Debug, Clone)]
pub struct ResolvedAttack {
    pub entry: AttackEntry,
    pub dice: Vec<DiceNotation>,
}

/// Outcome of one d6 draw against an attack or effect table. `attack` is
/// None when no entry matched the roll - a valid result, not an error.
#[derive(Debug, Clone)]
pub struct AttackRollOutcome {
    pub roll: u8,
    pub attack: Option<ResolvedAttack>,
}

/// Outcome of a damage/willpower application, including how sibling
/// propagation went.
#[derive(Debug, Clone)]
pub struct DamageOutcome {
    pub combatant: Combatant,
    pub new_value: i32,
    /// Siblings that received the synchronized value.
    pub synced_siblings: usize,
    /// Siblings whose write failed; their records are now divergent.
    pub failed_siblings: Vec<CombatantId>,
}

impl DamageOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed_siblings.is_empty()
    }
}

pub struct AttackService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    combatants: Arc<dyn CombatantRepositoryPort>,
    templates: Arc<dyn MonsterTemplateProviderPort>,
    log: Arc<CombatLogService>,
    notifier: Arc<dyn ChangeNotifierPort>,
}

impl AttackService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        combatants: Arc<dyn CombatantRepositoryPort>,
        templates: Arc<dyn MonsterTemplateProviderPort>,
        log: Arc<CombatLogService>,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        Self {
            encounters,
            combatants,
            templates,
            log,
            notifier,
        }
    }

    /// Roll a d6 on a monster's action table. First matching entry wins;
    /// an unmatched roll yields no attack.
    pub async fn roll_attack(
        &self,
        combatant_id: CombatantId,
    ) -> Result<AttackRollOutcome, AttackError> {
        // A Send rng: the borrow lives across the awaits below.
        let mut rng = StdRng::from_entropy();
        self.roll_attack_with(combatant_id, &mut rng).await
    }

    /// Rng-injected core of `roll_attack`, used directly by tests.
    pub async fn roll_attack_with<R: Rng>(
        &self,
        combatant_id: CombatantId,
        rng: &mut R,
    ) -> Result<AttackRollOutcome, AttackError> {
        let combatant = self.get_combatant(combatant_id).await?;
        let template_ref = combatant.template_ref().ok_or_else(|| {
            AttackError::Validation(format!(
                "{} is a player character and has no attack table",
                combatant.display_name
            ))
        })?;
        let template = self
            .templates
            .get(template_ref)
            .await?
            .ok_or(AttackError::TemplateNotFound(template_ref))?;

        let roll: u8 = rng.gen_range(1..=6);
        let attack = template.attack_for_roll(roll).cloned();

        if let Some(entry) = &attack {
            self.log
                .append(
                    combatant.encounter_id,
                    LogEventKind::MonsterAttack {
                        combatant_id,
                        name: combatant.display_name.clone(),
                        roll,
                        attack_name: entry.name.clone(),
                    },
                )
                .await
                .map_err(anyhow::Error::from)?;
            self.notifier
                .notify(combatant.encounter_id, ChangeTopic::Encounter);
        }

        Ok(AttackRollOutcome {
            roll,
            attack: attack.map(|entry| {
                let dice = entry.embedded_dice();
                ResolvedAttack { entry, dice }
            }),
        })
    }

    /// Roll on the effect table nested under a named attack entry.
    pub async fn roll_effect(
        &self,
        combatant_id: CombatantId,
        attack_name: &str,
    ) -> Result<AttackRollOutcome, AttackError> {
        let combatant = self.get_combatant(combatant_id).await?;
        let template_ref = combatant.template_ref().ok_or_else(|| {
            AttackError::Validation(format!(
                "{} is a player character and has no attack table",
                combatant.display_name
            ))
        })?;
        let template = self
            .templates
            .get(template_ref)
            .await?
            .ok_or(AttackError::TemplateNotFound(template_ref))?;

        let effect_table = template
            .attack_table
            .iter()
            .find(|e| e.name == attack_name)
            .ok_or_else(|| {
                AttackError::Validation(format!("no attack named '{}'", attack_name))
            })?
            .effect_table
            .as_deref()
            .ok_or_else(|| {
                AttackError::Validation(format!("attack '{}' has no effect table", attack_name))
            })?;

        let roll: u8 = rand::thread_rng().gen_range(1..=6);
        let attack = effect_table
            .iter()
            .find(|e| e.roll_match.contains(roll))
            .cloned();
        Ok(AttackRollOutcome {
            roll,
            attack: attack.map(|entry| {
                let dice = entry.embedded_dice();
                ResolvedAttack { entry, dice }
            }),
        })
    }

    /// Apply signed damage (negative heals) to a target, clamped to
    /// `[0, max_hp]`, and mirror the new HP onto every group sibling.
    /// Appends one `attack_resolve` event naming attacker and target.
    pub async fn apply_damage(
        &self,
        target_id: CombatantId,
        amount: i32,
        attacker: Option<String>,
    ) -> Result<DamageOutcome, AttackError> {
        let mut target = self.get_combatant(target_id).await?;
        self.ensure_mutable(target.encounter_id).await?;

        let new_hp = target.apply_damage(amount);
        self.combatants.update(&target).await?;

        let failed = self.sync_siblings(&target, |sibling| sibling.sync_hp(new_hp)).await?;
        let synced = self.report_partial_sync(&target, "HP", &failed).await?;

        self.log
            .append(
                target.encounter_id,
                LogEventKind::AttackResolve {
                    attacker: attacker.unwrap_or_else(|| "DM".to_string()),
                    target: target.display_name.clone(),
                    amount,
                },
            )
            .await
            .map_err(anyhow::Error::from)?;

        self.notifier
            .notify(target.encounter_id, ChangeTopic::Combatants);
        Ok(DamageOutcome {
            new_value: new_hp,
            combatant: target,
            synced_siblings: synced,
            failed_siblings: failed,
        })
    }

    /// Apply signed willpower loss (negative restores), sibling-mirrored
    /// like HP. Rejected when the target has no WP track.
    pub async fn apply_willpower(
        &self,
        target_id: CombatantId,
        amount: i32,
    ) -> Result<DamageOutcome, AttackError> {
        let mut target = self.get_combatant(target_id).await?;
        self.ensure_mutable(target.encounter_id).await?;

        let new_wp = target.apply_willpower(amount).ok_or_else(|| {
            AttackError::Validation(format!(
                "{} has no willpower track",
                target.display_name
            ))
        })?;
        self.combatants.update(&target).await?;

        let failed = self.sync_siblings(&target, |sibling| sibling.sync_wp(new_wp)).await?;
        let synced = self.report_partial_sync(&target, "WP", &failed).await?;

        self.log
            .append(
                target.encounter_id,
                LogEventKind::WpChange {
                    combatant_id: target.id,
                    name: target.display_name.clone(),
                    delta: amount,
                    new_value: new_wp,
                },
            )
            .await
            .map_err(anyhow::Error::from)?;

        self.notifier
            .notify(target.encounter_id, ChangeTopic::Combatants);
        Ok(DamageOutcome {
            new_value: new_wp,
            combatant: target,
            synced_siblings: synced,
            failed_siblings: failed,
        })
    }

    /// Manual HP edit (a player correcting their sheet). Clamped, sibling
    /// mirrored, logged as `hp_change` with the implied delta.
    pub async fn set_hp(
        &self,
        target_id: CombatantId,
        new_hp: i32,
    ) -> Result<DamageOutcome, AttackError> {
        let target = self.get_combatant(target_id).await?;
        let delta = target.current_hp - new_hp.clamp(0, target.max_hp);
        let mut outcome = self.apply_damage_inner(target, delta).await?;

        self.log
            .append(
                outcome.combatant.encounter_id,
                LogEventKind::HpChange {
                    combatant_id: outcome.combatant.id,
                    name: outcome.combatant.display_name.clone(),
                    delta,
                    new_value: outcome.new_value,
                },
            )
            .await
            .map_err(anyhow::Error::from)?;

        self.notifier
            .notify(outcome.combatant.encounter_id, ChangeTopic::Combatants);
        outcome.new_value = outcome.combatant.current_hp;
        Ok(outcome)
    }

    /// Damage application without the `attack_resolve` log entry; shared by
    /// `set_hp`.
    async fn apply_damage_inner(
        &self,
        mut target: Combatant,
        amount: i32,
    ) -> Result<DamageOutcome, AttackError> {
        self.ensure_mutable(target.encounter_id).await?;

        let new_hp = target.apply_damage(amount);
        self.combatants.update(&target).await?;

        let failed = self.sync_siblings(&target, |sibling| sibling.sync_hp(new_hp)).await?;
        let synced = self.report_partial_sync(&target, "HP", &failed).await?;

        Ok(DamageOutcome {
            new_value: new_hp,
            combatant: target,
            synced_siblings: synced,
            failed_siblings: failed,
        })
    }

    /// Mirror a value onto every sibling of `target`'s group, one record
    /// at a time in roster order. Returns the ids whose write failed.
    async fn sync_siblings<F>(
        &self,
        target: &Combatant,
        mut apply: F,
    ) -> Result<Vec<CombatantId>, AttackError>
    where
        F: FnMut(&mut Combatant),
    {
        let Some(group_id) = target.group_id() else {
            return Ok(Vec::new());
        };

        let roster = self.combatants.list(target.encounter_id).await?;
        let mut failed = Vec::new();
        for mut sibling in roster {
            if sibling.id == target.id || sibling.group_id() != Some(group_id) {
                continue;
            }
            apply(&mut sibling);
            if let Err(e) = self.combatants.update(&sibling).await {
                tracing::warn!(
                    combatant_id = %sibling.id,
                    "Sibling write failed, group now divergent: {}",
                    e
                );
                failed.push(sibling.id);
            }
        }
        Ok(failed)
    }

    /// Log a `generic` warning when some sibling writes failed. Returns the
    /// count of siblings that did sync.
    async fn report_partial_sync(
        &self,
        target: &Combatant,
        track: &str,
        failed: &[CombatantId],
    ) -> Result<usize, AttackError> {
        let Some(group_id) = target.group_id() else {
            return Ok(0);
        };
        let roster = self.combatants.list(target.encounter_id).await?;
        let siblings = roster
            .iter()
            .filter(|c| c.id != target.id && c.group_id() == Some(group_id))
            .count();

        if !failed.is_empty() {
            self.log
                .append(
                    target.encounter_id,
                    LogEventKind::Generic {
                        message: format!(
                            "{} sync for group of {} reached {} of {} siblings; manual correction needed",
                            track,
                            target.display_name,
                            siblings - failed.len(),
                            siblings
                        ),
                    },
                )
                .await
                .map_err(anyhow::Error::from)?;
        }
        Ok(siblings - failed.len())
    }

    async fn get_combatant(&self, id: CombatantId) -> Result<Combatant, AttackError> {
        self.combatants
            .get(id)
            .await?
            .ok_or(AttackError::CombatantNotFound(id))
    }

    async fn ensure_mutable(&self, encounter_id: EncounterId) -> Result<(), AttackError> {
        let encounter = self
            .encounters
            .get(encounter_id)
            .await?
            .ok_or(AttackError::EncounterNotFound(encounter_id))?;
        if encounter.status == EncounterStatus::Completed {
            return Err(AttackError::EncounterCompleted(encounter_id));
        }
        Ok(())
    }
}
