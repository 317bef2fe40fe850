//! Persistence adapters - SQLite for real runs, in-memory for tests/dev

pub(crate) mod combatant_repository;
mod compendium_repository;
mod encounter_repository;
mod log_repository;
mod memory;

pub use combatant_repository::SqliteCombatantRepository;
pub use compendium_repository::SqliteCompendium;
pub use encounter_repository::SqliteEncounterRepository;
pub use log_repository::SqliteCombatLogRepository;
pub use memory::{InMemoryCompendium, InMemoryStore};
