//! Combat log events - the append-only audit record of an encounter
//!
//! Events are written once and never mutated or reordered. Clients render
//! the log verbatim; the engine replays nothing from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CombatantId, EncounterId, EventId};

/// One combat log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: EventId,
    pub encounter_id: EncounterId,
    pub timestamp: DateTime<Utc>,
    pub kind: LogEventKind,
}

impl LogEvent {
    pub fn now(encounter_id: EncounterId, kind: LogEventKind) -> Self {
        Self {
            id: EventId::new(),
            encounter_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// What happened. Payloads carry just enough for a readable log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEventKind {
    /// An explicit round advance (round 1 at `start` is implicit and
    /// unlogged).
    RoundAdvanced { round: u32 },
    /// A combatant flipped its card to act.
    TurnStart {
        combatant_id: CombatantId,
        name: String,
    },
    /// A combatant unflipped its card (holding a reaction).
    TurnEnd {
        combatant_id: CombatantId,
        name: String,
    },
    /// HP moved; delta is signed damage (negative = healing).
    HpChange {
        combatant_id: CombatantId,
        name: String,
        delta: i32,
        new_value: i32,
    },
    /// WP moved; same sign convention as HP.
    WpChange {
        combatant_id: CombatantId,
        name: String,
        delta: i32,
        new_value: i32,
    },
    /// A monster rolled on its action table.
    MonsterAttack {
        combatant_id: CombatantId,
        name: String,
        roll: u8,
        attack_name: String,
    },
    /// Damage/healing was resolved against a target.
    AttackResolve {
        attacker: String,
        target: String,
        amount: i32,
    },
    /// Free-form entry (also used for partial-sync warnings).
    Generic { message: String },
}

impl LogEventKind {
    /// Short tag used for storage and filtering.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::RoundAdvanced { .. } => "round_advanced",
            Self::TurnStart { .. } => "turn_start",
            Self::TurnEnd { .. } => "turn_end",
            Self::HpChange { .. } => "hp_change",
            Self::WpChange { .. } => "wp_change",
            Self::MonsterAttack { .. } => "monster_attack",
            Self::AttackResolve { .. } => "attack_resolve",
            Self::Generic { .. } => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = LogEventKind::RoundAdvanced { round: 3 };
        let json = serde_json::to_value(&kind).expect("serializes");
        assert_eq!(json["type"], "round_advanced");
        assert_eq!(json["round"], 3);

        let back: LogEventKind = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, kind);
    }

    #[test]
    fn tags_match_serde_names() {
        let id = CombatantId::new();
        let cases = vec![
            LogEventKind::RoundAdvanced { round: 1 },
            LogEventKind::TurnStart {
                combatant_id: id,
                name: "Goblin".into(),
            },
            LogEventKind::AttackResolve {
                attacker: "Goblin".into(),
                target: "Aldric".into(),
                amount: 4,
            },
            LogEventKind::Generic {
                message: "note".into(),
            },
        ];
        for kind in cases {
            let json = serde_json::to_value(&kind).expect("serializes");
            assert_eq!(json["type"], kind.tag());
        }
    }
}
