//! Application services - one per engine component

mod attack_service;
mod encounter_service;
mod initiative_service;
mod log_service;
mod roster_service;
mod turn_service;

pub use attack_service::{AttackError, AttackRollOutcome, AttackService, DamageOutcome};
pub use encounter_service::{EncounterError, EncounterService};
pub use initiative_service::{InitiativeError, InitiativeService};
pub use log_service::{CombatLogService, LogError};
pub use roster_service::{RosterError, RosterService};
pub use turn_service::{TurnError, TurnService};

#[cfg(test)]
mod tests;
