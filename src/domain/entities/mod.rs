//! Domain entities - Core business objects with identity

mod character;
mod combatant;
mod encounter;
mod monster;

pub use character::CharacterSheet;
pub use combatant::{next_actor, sort_turn_order, Combatant, CombatantKind};
pub use encounter::{Encounter, EncounterStatus};
pub use monster::{AttackEntry, MonsterStats, MonsterTemplate, RollMatch};
