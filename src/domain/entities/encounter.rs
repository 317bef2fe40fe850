//! Encounter entity - one bounded combat engagement for a party

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CombatantId, EncounterId, PartyId};

/// Lifecycle of an encounter. Planning -> Active -> Completed, with
/// Completed terminal (a completed encounter can be duplicated into a fresh
/// Planning one, never reopened).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    Planning,
    Active,
    Completed,
}

impl EncounterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planning" => Some(Self::Planning),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One combat session: roster, round counter and lifecycle status. Log
/// entries are stored separately, keyed by encounter id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    pub party_id: PartyId,
    pub name: String,
    pub description: String,
    pub status: EncounterStatus,
    /// 0 while planning; set to 1 by `start`.
    pub current_round: u32,
    pub active_combatant_id: Option<CombatantId>,
    pub created_at: DateTime<Utc>,
}

impl Encounter {
    pub fn new(party_id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id: EncounterId::new(),
            party_id,
            name: name.into(),
            description: String::new(),
            status: EncounterStatus::Planning,
            current_round: 0,
            active_combatant_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == EncounterStatus::Active
    }

    /// Planning -> Active, round 1.
    pub fn start(&mut self) -> bool {
        if self.status != EncounterStatus::Planning {
            return false;
        }
        self.status = EncounterStatus::Active;
        self.current_round = 1;
        true
    }

    /// Bump the round counter. Valid only while active.
    pub fn advance_round(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.current_round += 1;
        true
    }

    /// Active -> Completed.
    pub fn end(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = EncounterStatus::Completed;
        self.active_combatant_id = None;
        true
    }

    /// A fresh Planning copy of this encounter (roster is copied by the
    /// caller; combatant state resets happen there too).
    pub fn duplicated(&self) -> Self {
        Self {
            id: EncounterId::new(),
            party_id: self.party_id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: EncounterStatus::Planning,
            current_round: 0,
            active_combatant_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_one_way() {
        let mut e = Encounter::new(PartyId::new(), "Ambush at the ford");
        assert_eq!(e.status, EncounterStatus::Planning);
        assert_eq!(e.current_round, 0);

        assert!(e.start());
        assert_eq!(e.status, EncounterStatus::Active);
        assert_eq!(e.current_round, 1);

        // Can't start twice.
        assert!(!e.start());

        assert!(e.advance_round());
        assert_eq!(e.current_round, 2);

        assert!(e.end());
        assert_eq!(e.status, EncounterStatus::Completed);

        // Terminal: no restart, no further rounds.
        assert!(!e.start());
        assert!(!e.advance_round());
        assert!(!e.end());
    }

    #[test]
    fn cannot_advance_round_while_planning() {
        let mut e = Encounter::new(PartyId::new(), "Ambush");
        assert!(!e.advance_round());
        assert_eq!(e.current_round, 0);
    }

    #[test]
    fn duplicate_resets_to_planning() {
        let mut e = Encounter::new(PartyId::new(), "Ambush").with_description("night raid");
        e.start();
        e.advance_round();
        e.end();

        let copy = e.duplicated();
        assert_ne!(copy.id, e.id);
        assert_eq!(copy.party_id, e.party_id);
        assert_eq!(copy.name, e.name);
        assert_eq!(copy.description, e.description);
        assert_eq!(copy.status, EncounterStatus::Planning);
        assert_eq!(copy.current_round, 0);
        assert!(copy.active_combatant_id.is_none());
    }
}
