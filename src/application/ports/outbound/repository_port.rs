//! Repository ports - Interfaces for encounter persistence
//!
//! These traits define the contracts that infrastructure repositories must
//! implement. Application services depend on these traits, not concrete
//! implementations.
//!
//! Each method is a single linearizable operation at the store. Methods
//! documented as atomic run inside one transaction; everything else is one
//! record per call. Sibling-group HP writes deliberately do NOT get a
//! grouped method here - the attack service issues them as an ordered
//! sequence of `update` calls (see the partial-sync handling there).

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::{Combatant, Encounter};
use crate::domain::events::LogEvent;
use crate::domain::value_objects::{CombatantId, EncounterId, GroupId, PartyId};

/// Repository port for Encounter records.
#[async_trait]
pub trait EncounterRepositoryPort: Send + Sync {
    /// Create a new encounter.
    async fn create(&self, encounter: &Encounter) -> Result<()>;

    /// Get an encounter by id.
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>>;

    /// List all encounters of a party.
    async fn list_by_party(&self, party_id: PartyId) -> Result<Vec<Encounter>>;

    /// Update an encounter.
    async fn update(&self, encounter: &Encounter) -> Result<()>;

    /// Atomically insert a duplicated encounter together with its copied
    /// roster.
    async fn create_with_combatants(
        &self,
        encounter: &Encounter,
        combatants: &[Combatant],
    ) -> Result<()>;

    /// Atomically commit a round advance: write the already-bumped
    /// encounter record, clear every `has_acted` flag in the roster, and
    /// store the re-dealt initiative values.
    async fn advance_round(
        &self,
        encounter: &Encounter,
        initiatives: &[(CombatantId, i32)],
    ) -> Result<()>;
}

/// Repository port for Combatant records.
#[async_trait]
pub trait CombatantRepositoryPort: Send + Sync {
    /// Create a single combatant.
    async fn create(&self, combatant: &Combatant) -> Result<()>;

    /// Create a batch of combatants (one monster group) atomically.
    async fn create_many(&self, combatants: &[Combatant]) -> Result<()>;

    /// Get a combatant by id.
    async fn get(&self, id: CombatantId) -> Result<Option<Combatant>>;

    /// List the roster of an encounter.
    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<Combatant>>;

    /// Update one combatant record (single linearizable write).
    async fn update(&self, combatant: &Combatant) -> Result<()>;

    /// Delete one combatant.
    async fn delete(&self, id: CombatantId) -> Result<()>;

    /// Delete every slot of a monster instance group. Returns how many
    /// records were removed.
    async fn delete_group(&self, encounter_id: EncounterId, group_id: GroupId) -> Result<u64>;

    /// Atomically write initiative values for a set of combatants.
    async fn set_initiatives(&self, values: &[(CombatantId, i32)]) -> Result<()>;

    /// Atomically exchange the initiative values of two combatants. Both
    /// succeed or neither does - never a half-swap.
    async fn swap_initiative(&self, a: CombatantId, b: CombatantId) -> Result<()>;
}

/// Repository port for the append-only combat log.
#[async_trait]
pub trait CombatLogRepositoryPort: Send + Sync {
    /// Append one event. There is no update or delete surface.
    async fn append(&self, event: &LogEvent) -> Result<()>;

    /// List an encounter's events in insertion order.
    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<LogEvent>>;
}
