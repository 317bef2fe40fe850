//! Change-notification port - how committed mutations reach watchers
//!
//! A notification is a cache-invalidation signal scoped to one encounter,
//! not a delta: receivers re-fetch the affected collection. Encounter
//! metadata and the combatant roster are independent topics so a roster
//! change does not force a metadata re-fetch.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EncounterId;

/// Which collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTopic {
    /// The Encounter record itself (status, round, name...).
    Encounter,
    /// The combatant roster (membership, HP, initiative, flags).
    Combatants,
}

/// One committed-mutation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification {
    pub encounter_id: EncounterId,
    pub topic: ChangeTopic,
}

/// Outbound port services use to announce committed mutations.
///
/// Sending is fire-and-forget: a notifier with no listeners is not an
/// error, and delivery is best-effort (a lagged watcher re-fetches when it
/// reconnects).
pub trait ChangeNotifierPort: Send + Sync {
    fn notify(&self, encounter_id: EncounterId, topic: ChangeTopic);
}
