//! Domain layer - Core combat-session logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Encounter, Combatant, MonsterTemplate, CharacterSheet
//! - Value Objects: ids, initiative deck, dice notation
//! - Events: the combat log record types

pub mod entities;
pub mod events;
pub mod value_objects;
