//! Wire shapes for attack rolls and damage outcomes

use serde::{Deserialize, Serialize};

use crate::application::services::{AttackRollOutcome, DamageOutcome};
use crate::domain::entities::{AttackEntry, RollMatch};
use crate::domain::value_objects::DiceNotation;

use super::CombatantData;

/// One d6 draw against an attack or effect table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackRollData {
    pub roll: u8,
    /// None when no table entry matched the roll.
    pub attack: Option<AttackEntryData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackEntryData {
    /// Serializes as its text form ("1-5" or "6").
    pub roll_match: RollMatch,
    pub name: String,
    pub description: String,
    /// Dice notation recognized in the description, for the companion
    /// roll utility.
    pub dice: Vec<DiceNotation>,
    pub has_effect_table: bool,
}

impl AttackEntryData {
    fn new(entry: &AttackEntry, dice: Vec<DiceNotation>) -> Self {
        Self {
            roll_match: entry.roll_match,
            name: entry.name.clone(),
            description: entry.description.clone(),
            dice,
            has_effect_table: entry.effect_table.is_some(),
        }
    }
}

impl From<&AttackRollOutcome> for AttackRollData {
    fn from(outcome: &AttackRollOutcome) -> Self {
        Self {
            roll: outcome.roll,
            attack: outcome
                .attack
                .as_ref()
                .map(|resolved| AttackEntryData::new(&resolved.entry, resolved.dice.clone())),
        }
    }
}

/// Result of a damage/willpower application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageData {
    pub combatant: CombatantData,
    pub new_value: i32,
    pub synced_siblings: usize,
    /// True when some sibling writes failed and the group is divergent.
    pub partial_sync: bool,
}

impl DamageData {
    pub fn from_outcome(outcome: &DamageOutcome, template_name: Option<String>) -> Self {
        Self {
            combatant: CombatantData::from_combatant(&outcome.combatant, template_name),
            new_value: outcome.new_value,
            synced_siblings: outcome.synced_siblings,
            partial_sync: outcome.is_partial(),
        }
    }
}
